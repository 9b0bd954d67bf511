// src/bin/cli.rs
fn main() -> color_eyre::Result<()> {
    sonaa::cli::run()
}
