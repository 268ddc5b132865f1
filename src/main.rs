use halcyon_rs::auth;
use halcyon_rs::config::SdkConfig;
use halcyon_rs::mock_platform::MockPlatform;
use halcyon_rs::platform::Platform;
use halcyon_rs::sequencer::Sequencer;
use log::LevelFilter;
use simple_logger::SimpleLogger;

const CONFIG_PATH: &str = "sdk_config.json";

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Off)
        .with_module_level("halcyon_rs", LevelFilter::Trace)
        .init()
        .unwrap();

    let config = SdkConfig::load(CONFIG_PATH).unwrap_or_else(|_| SdkConfig::default());

    // The real runtime is closed-source; the bundled mock platform stands in
    // for it so the demo runs anywhere.
    let adapter = MockPlatform::new().with_jitter(3, 0xACE1);
    let platform = Platform::new(adapter, &config).expect("Failed to initialize platform");

    let session = auth::login(&platform, &config).expect("Failed to log in");
    println!("Logged in and user id is: {}", session.user_id());

    let mut sequencer = Sequencer::new(&platform, session);
    sequencer.run().expect("Achievement workflow failed");

    println!("Closing program.");
}
