fn main() -> Result<(), winit::error::EventLoopError> {
    compute_sims::app::run()
}
