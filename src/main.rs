use minish::config::Config;
use minish::repl::Repl;

fn main() {
    let config = Config::from_env();
    let mut repl = Repl::new(config);
    let code = match repl.run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("minish: {}", e);
            1
        }
    };
    std::process::exit(code);
}
