use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    blind_receiver::apps::run_classify_report(std::env::args().skip(1))
}
