use std::io::Result;

fn main() -> Result<()> {
    // onnxruntime (pulled in by usls) needs compiler-rt builtins on Apple targets
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "tvos"))]
    println!("cargo:rustc-link-arg=-fapple-link-rtlib");

    Ok(())
}
