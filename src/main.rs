fn main() {
    env_logger::init();
    lovetcs::run();
}
