use std::env;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set; this must be run by Cargo.");

    gen_bindata::Config::new(["blobs"])
        .prefix("blobs")
        .package("assets")
        .output(format!("{out_dir}/bindata"))
        .source_output(format!("{out_dir}/bindata.rs"))
        .cargo_rerun(true)
        .build()
        .expect("Failed to pack assets");
}
