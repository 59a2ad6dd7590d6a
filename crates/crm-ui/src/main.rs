#![forbid(unsafe_code)]
#![warn(unused, clippy::all, clippy::pedantic, missing_docs)]
//! Binary target consumed by `trunk`; natively it only explains how to run the client.

#[cfg(target_arch = "wasm32")]
fn main() {
    crm_ui::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_NOTICE: &str =
    "crm-ui runs in the browser: `trunk serve` starts it on port 4200 against the API on port 8000.";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    writeln!(std::io::stderr().lock(), "{NATIVE_NOTICE}")
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_notice_names_dev_ports() -> std::io::Result<()> {
        assert!(NATIVE_NOTICE.contains("4200"));
        assert!(NATIVE_NOTICE.contains("8000"));
        main()
    }
}
