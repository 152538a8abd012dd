use shunting::{Expression, VarSet};
use std::io::{BufRead, BufReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut variables = VarSet::new();
    let stdin = std::io::stdin();

    for line in BufReader::new(stdin.lock()).lines() {
        let line = line?;

        let expr: Expression = match line.parse() {
            Ok(expr) => expr,
            Err(e) => {
                eprintln!("Unable to parse \"{}\": {}", line, e);
                continue;
            },
        };

        println!("  parsed:     {}", expr);
        println!("  derivative: {}", expr.differentiate());

        match expr.evaluate(&mut variables) {
            Ok(value) => println!("  value:      {}", value),
            Err(e) => eprintln!("  {}", e),
        }
    }

    Ok(())
}
