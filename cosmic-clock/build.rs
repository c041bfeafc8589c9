//! Records the build time so a clock that lost power can be set to something
//! close to the real time.

use std::env;
use std::fs;
use std::path::Path;

use chrono::{Datelike, Local, Timelike};

fn main() {
    // Restamp whenever the firmware or the library it embeds changes
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=../cosmic-clock-lib/src");

    let now = Local::now().naive_local();
    let out = Path::new(&env::var("OUT_DIR").expect("OUT_DIR is set by cargo")).join("build_time.rs");
    fs::write(
        &out,
        format!(
            "/// Local time at which this firmware was built.\n\
             pub const BUILD_TIME: CivilTimestamp = CivilTimestamp::new({}, {}, {}, {}, {}, {});\n",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        ),
    )
    .expect("write build_time.rs");
}
