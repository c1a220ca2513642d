use std::env;

const DEFAULT_SERVER_URL: &str = "http://localhost:3002";

fn main() {
    let version = env::var("CAR_PREDICTOR_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=CAR_PREDICTOR_VERSION={version}");

    let server = env::var("CAR_PREDICTOR_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.into());
    println!("cargo:rustc-env=CAR_PREDICTOR_SERVER_URL={server}");
    println!("cargo:rerun-if-env-changed=CAR_PREDICTOR_VERSION");
    println!("cargo:rerun-if-env-changed=CAR_PREDICTOR_SERVER_URL");
}
