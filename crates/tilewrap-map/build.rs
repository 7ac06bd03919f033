use serde::Deserialize;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Deserialize, Debug)]
struct BaseColor {
    name: String,
    rgb: [u8; 3],
}

#[derive(Deserialize, Debug)]
struct BaseColorFile {
    base_colors: Vec<BaseColor>,
}

fn main() {
    let base_colors_path = "base_colors.json";
    let base_colors_json =
        fs::read_to_string(base_colors_path).expect("Failed to read base_colors.json");

    let file: BaseColorFile =
        serde_json::from_str(&base_colors_json).expect("Failed to parse base_colors.json");

    // Four shades per base color must fit in a 256 entry palette.
    assert!(
        file.base_colors.len() * 4 <= 256,
        "base_colors.json holds {} colors, at most 64 fit",
        file.base_colors.len()
    );

    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("base_colors.rs");
    let mut out_file = File::create(&dest_path).expect("Failed to create base_colors.rs");

    writeln!(&mut out_file, "pub static BASE_COLORS: &[[u8; 3]] = &[").unwrap();
    for color in &file.base_colors {
        let [r, g, b] = color.rgb;
        writeln!(&mut out_file, "    [{}, {}, {}], // {}", r, g, b, color.name).unwrap();
    }
    writeln!(&mut out_file, "];").unwrap();

    println!("cargo:rerun-if-changed={}", base_colors_path);
}
