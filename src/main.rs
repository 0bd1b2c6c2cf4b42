fn main() -> anyhow::Result<()> {
    matcap_text::flow::run()
}
