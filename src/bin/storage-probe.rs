use storage_probe::app::{run_cli, UNKNOWN_EXIT_CODE};

fn run() -> Result<i32, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = run_cli(args)?;
    println!("{}", output.text);
    Ok(output.exit_code)
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("UNKNOWN - {err}");
            std::process::exit(UNKNOWN_EXIT_CODE);
        }
    }
}
