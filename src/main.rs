fn main() -> anyhow::Result<()> {
    trajectory_viewer::cli::run()
}
