use std::{fs, io};

fn main() -> io::Result<()> {
    // The out_dir must exist before tonic-build writes into it.
    fs::create_dir_all("./generated/")?;

    tonic_build::configure()
        .out_dir("./generated/")
        .compile(&["./protos/feedmesh.proto"], &["./protos/"])
}
