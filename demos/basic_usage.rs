//! Basic usage examples for NearTx

use neartx::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== NearTx Basic Usage Examples ===\n");

    // Example 1: Signing a transfer
    example_transfer()?;

    // Example 2: Building a transaction by hand
    example_builder()?;

    // Example 3: Signing from a JSON request
    example_json_request()?;

    // Example 4: Decoding a signed payload
    example_decoding()?;

    Ok(())
}

fn transfer_input() -> Result<SigningInput, Box<dyn std::error::Error>> {
    Ok(SigningInput {
        signer_id: "test.near".to_string(),
        nonce: 1,
        receiver_id: "whatever.near".to_string(),
        private_key: hex::decode("8737b99bf16fba78e1e753e23ba00c4b5423ac9c45d9b9caae9a519434786568")?,
        block_hash: hex::decode("0fa473fd26901df296be6adc4cc4df34d040efa2435224b6986910e630c2fef6")?,
        actions: vec![Action::transfer(1u128)],
    })
}

fn example_transfer() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 1: Signing a Transfer");
    println!("-----------------------------");

    let output = transfer_input()?.sign()?;

    println!("✓ Transaction signed");
    println!("  Size: {} bytes", output.signed_transaction.len());
    println!("  Hash: {}", output.hash_base58());
    println!("  Base64: {}", output.signed_transaction_base64());
    println!();

    Ok(())
}

fn example_builder() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 2: Using the Transaction Builder");
    println!("----------------------------------------");

    let secret = SecretKey::from_bytes(&[7u8; 32])?;
    let validator: PublicKey = "ed25519:C2P7YcEmBv31vtCHLBcESteN4Yi4vSCkXEXMTANyB649".parse()?;
    let stake: Balance = "2490000000000000000000000000".parse()?;

    let transaction = TransactionBuilder::new()
        .signer_id("vdx.testnet")
        .public_key(secret.public_key())
        .nonce(93128451000005)
        .receiver_id("vdx.testnet")
        .block_hash(&[0u8; 32])
        .add_action(Action::transfer(1u128))
        .add_action(Action::stake(stake, validator))
        .build()?;

    println!("✓ Transaction built");
    println!("  Size: {} bytes", transaction.byte_size());
    println!("  Actions:");
    for action in &transaction.actions {
        println!("    - {} (discriminant {})", action.name(), action.discriminant());
    }
    println!();

    Ok(())
}

fn example_json_request() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 3: Signing a JSON Request");
    println!("---------------------------------");

    let json = r#"{
        "signer_id": "test.near",
        "receiver_id": "whatever.near",
        "nonce": 1,
        "private_key": "8737b99bf16fba78e1e753e23ba00c4b5423ac9c45d9b9caae9a519434786568",
        "block_hash": "244ZQ9cgj3CQ6bWBdytfrJMuMQ1jdXLFGnr4HhvtCTnM",
        "actions": [{ "type": "transfer", "deposit": "1" }]
    }"#;

    let output = SigningRequest::from_json(json)?.into_signing_input()?.sign()?;
    println!("✓ Request signed");
    println!("  Hash: {}", output.hash_hex());
    println!(
        "  Matches typed input: {}",
        output == transfer_input()?.sign()?
    );
    println!();

    Ok(())
}

fn example_decoding() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 4: Decoding & Verification");
    println!("----------------------------------");

    let output = transfer_input()?.sign()?;
    let signed = output.decode()?;
    signed.verify()?;

    println!("✓ Signature verified");
    println!("  Signer: {}", signed.transaction.signer_id);
    println!("  Public key: {}", signed.transaction.public_key);
    println!("  Nonce: {}", signed.transaction.nonce);
    println!("  Signature: {}", signed.signature);
    println!();

    Ok(())
}
