fn main() -> anyhow::Result<()> {
    uassetkit::cli::run_cli()
}
