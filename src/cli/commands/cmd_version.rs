use clap::Args;
use clap::crate_version;

#[derive(Args, Debug)]
pub struct VersionCommand;

pub async fn execute(action: &VersionCommand) {
    match action {
        VersionCommand {} => print_version(),
    }
}

pub fn print_version() {
    println!("TWIG version: {}", crate_version!());
}
