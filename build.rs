use vergen::EmitBuilder;

// Build date for the sidebar footer; target and rustc for the startup log.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    EmitBuilder::builder()
        .build_date()
        .cargo_target_triple()
        .rustc_semver()
        .emit()?;
    Ok(())
}
