use std::io;

fn main() {
    let mut input = String::new();
    io::stdin().read_line(&mut input).expect("read n");
    let n: usize = input.trim().parse().unwrap();

    let mut line = String::new();
    io::stdin().read_line(&mut line).expect("read values");
    let values: Vec<i64> = line
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();

    let mut name = String::new();
    io::stdin().read_line(&mut name).expect("read name");

    println!("{} {:?} {}", n, values, name.trim());
}
