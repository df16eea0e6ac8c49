fn main() -> anyhow::Result<()> {
    filter_panel::run()
}
