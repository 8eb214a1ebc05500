mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Scene selection via command line argument, both scenes by default
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--rotator") => cli::run_rotator_scene(),
        Some("--slider") => cli::run_slider_scene(),
        _ => {
            cli::run_rotator_scene()?;
            cli::run_slider_scene()
        }
    }
}
