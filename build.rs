use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs the CLI --version output
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
