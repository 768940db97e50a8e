fn main() {
    veclog_pipeline::cli::run();
}
