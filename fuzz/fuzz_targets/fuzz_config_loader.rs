#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Station config loading must reject arbitrary TOML gracefully, never
    // panic. Parse errors and validation errors are both acceptable.
    match tally_config::load_toml(data) {
        Ok(cfg) => {
            let _ = cfg.validate();
        }
        Err(_e) => {
            // parse error is acceptable
        }
    }
});
