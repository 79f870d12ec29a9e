use std::env;
use std::fs;
use std::path::Path;

// Forward a local .env into rustc-env so the production profile can be baked in.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    for key in [
        "SHOP_PROD_API_SERVER_URL",
        "SHOP_PROD_AUTH0_URL",
        "SHOP_PROD_AUTH0_AUDIENCE",
        "SHOP_PROD_AUTH0_CLIENT_ID",
        "SHOP_PROD_AUTH0_CALLBACK_URL",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let env_file = Path::new(".env");
    if !env_file.exists() {
        return;
    }

    println!("cargo:rerun-if-changed=.env");
    let Ok(contents) = fs::read_to_string(env_file) else {
        return;
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            // Real environment wins over .env
            if key.starts_with("SHOP_PROD_") && env::var(key).is_err() {
                println!("cargo:rustc-env={}={}", key, value);
            }
        }
    }
}
