// Generates message types, `chat_client::ChatClient` and the `chat_server::Chat`
// trait from the service contract.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/chat.proto");
    hrpc_build::compile_protos("proto/chat.proto")?;
    Ok(())
}
