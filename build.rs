fn main() {
    // Decide the leg width for the arithmetic core. Refer to src/arith.rs
    // for where this has an effect. 64-bit targets keep 60 magnitude bits
    // per u64 leg; everything else keeps 28 magnitude bits per u32 leg.
    let leg_width_64 = cfg!(any(
        target_arch = "aarch64",
        target_arch = "mips64",
        target_arch = "powerpc64",
        target_arch = "x86_64"
    ));
    if leg_width_64 {
        println!("cargo:rustc-cfg=leg_width_64");
    } else {
        println!("cargo:rustc-cfg=leg_width_32");
    }
    println!("cargo:rustc-check-cfg=cfg(leg_width_64)");
    println!("cargo:rustc-check-cfg=cfg(leg_width_32)");
}
