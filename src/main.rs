// This binary crate is intentionally minimal.
// All classifier logic lives in the library (src/lib.rs and its modules).
// Run the demo with:
//   cargo run --example two_blobs
fn main() {
    println!("magnetite: a from-scratch trainable classifier stack in Rust.");
    println!("Run `cargo run --example two_blobs` to see a training demo.");
}
