fn main() -> anyhow::Result<()> {
    transit_lib::run()
}
