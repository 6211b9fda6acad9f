fn main() -> anyhow::Result<()> {
    match_tracker_lib::run()
}
