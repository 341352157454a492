use tracker_core::{config::Config, day_action_info, training_info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects TRACKER_WEIGHT_KG and TRACKER_HEIGHT in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let b = cfg.biometrics;
    print!("{}", training_info("3456,ходьба,3h00m", b.weight, b.height)?);
    println!();
    print!("{}", day_action_info("+1000,30m0s", b.weight, b.height));
    Ok(())
}
