fn main() {
    if let Err(err) = ev_charging_api::app::run_demand() {
        eprintln!("demand service startup failed: {err}");
        std::process::exit(1);
    }
}
