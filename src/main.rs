use colored::Colorize;

fn main() {
    stubgen::logging::init();
    let command_line_interface = stubgen::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
