fn main() {
  if let Err(error) = pokedex_lib::run() {
    eprintln!("error: {}", error);
    std::process::exit(1);
  }
}
