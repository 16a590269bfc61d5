use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `user-desk --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
