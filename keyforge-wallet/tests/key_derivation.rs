//! Tests for key derivation

mod common;

use common::{init_tracing, ABANDON, LEGAL_WINNER};
use keyforge_wallet::crypto::keys::*;
use keyforge_wallet::crypto::mnemonic::*;
use keyforge_wallet::Error;

#[test]
fn test_ethereum_key_derivation() -> anyhow::Result<()> {
    init_tracing();
    let mnemonic = Mnemonic::parse(ABANDON)?;

    let wallet = derive_wallet(Chain::Ethereum, &mnemonic, "")?;

    assert_eq!(wallet.chain, Chain::Ethereum);
    assert_eq!(wallet.public_key, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    assert_eq!(
        wallet.private_key,
        "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
    );
    assert!(ethereum::is_valid_checksum_address(&wallet.public_key));
    Ok(())
}

#[test]
fn test_solana_key_derivation() -> anyhow::Result<()> {
    init_tracing();
    let mnemonic = Mnemonic::parse(ABANDON)?;

    let wallet = derive_wallet(Chain::Solana, &mnemonic, "")?;

    assert_eq!(wallet.chain, Chain::Solana);
    assert_eq!(wallet.public_key, "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");
    assert_eq!(
        wallet.private_key,
        "37df573b3ac4ad5b522e064e25b63ea16bcbe79d449e81a0268d1047948bb445\
         f036276246a75b9de3349ed42b15e232f6518fc20f5fcd4f1d64e81f9bd258f7"
    );
    assert_eq!(solana::decode_public_key(&wallet.public_key)?.len(), 32);
    Ok(())
}

#[test]
fn test_second_vector() -> anyhow::Result<()> {
    let mnemonic = Mnemonic::parse(LEGAL_WINNER)?;

    let sol = derive_wallet(Chain::Solana, &mnemonic, "")?;
    let eth = derive_wallet(Chain::Ethereum, &mnemonic, "")?;

    assert_eq!(sol.public_key, "BLeUXTx9thHGT7VJUtF9vHEmfMDgW1nnKZ9UVer2CoLX");
    assert_eq!(eth.public_key, "0x58A57ed9d8d624cBD12e2C467D34787555bB1b25");
    assert_eq!(
        eth.private_key,
        "0x33fa40f84e854b941c2b0436dd4a256e1df1cb41b9c1c0ccc8446408c19b8bf9"
    );
    Ok(())
}

#[test]
fn test_step_by_step_pipeline_matches_one_shot() -> anyhow::Result<()> {
    let mnemonic = Mnemonic::parse(ABANDON)?;
    let seed = mnemonic_to_seed(&mnemonic, "");

    let material = derive_key_material(&seed, &DerivationPath::SOLANA, Curve::Ed25519)?;
    assert_eq!(
        hex::encode(material.secret()),
        "37df573b3ac4ad5b522e064e25b63ea16bcbe79d449e81a0268d1047948bb445"
    );
    assert_eq!(
        hex::encode(material.chain_code()),
        "fb304a2a20f3d97f5240150cd6261a3f7d52e0981381f2c1f935d124d827de83"
    );

    let wallet = build_wallet(Chain::Solana, &material)?;
    assert_eq!(wallet, derive_wallet(Chain::Solana, &mnemonic, "")?);
    Ok(())
}

#[test]
fn test_path_determinism() -> anyhow::Result<()> {
    let seed = phrase_to_seed(ABANDON, "")?;

    let first = derive_key_material(&seed, &DerivationPath::SOLANA, Curve::Ed25519)?;
    let second = derive_key_material(&seed, &DerivationPath::SOLANA, Curve::Ed25519)?;

    assert_eq!(first.secret(), second.secret());
    assert_eq!(first.secret().len(), 32);
    Ok(())
}

#[test]
fn test_chain_separation() -> anyhow::Result<()> {
    let seed = phrase_to_seed(ABANDON, "")?;

    let sol = derive_key_material(&seed, &Chain::Solana.derivation_path(), Chain::Solana.curve())?;
    let eth = derive_key_material(&seed, &Chain::Ethereum.derivation_path(), Chain::Ethereum.curve())?;
    assert_ne!(sol.secret(), eth.secret());

    // Deriving one chain has no effect on the other
    let sol_again = derive_key_material(&seed, &Chain::Solana.derivation_path(), Chain::Solana.curve())?;
    assert_eq!(sol.secret(), sol_again.secret());

    let sol_wallet = build_wallet(Chain::Solana, &sol)?;
    let eth_wallet = build_wallet(Chain::Ethereum, &eth)?;
    assert_ne!(sol_wallet.public_key, eth_wallet.public_key);
    assert!(eth_wallet.public_key.starts_with("0x"));
    assert!(!sol_wallet.private_key.starts_with("0x"));
    Ok(())
}

#[test]
fn test_passphrase_changes_wallet() -> anyhow::Result<()> {
    let mnemonic = Mnemonic::parse(ABANDON)?;

    let plain = derive_wallet(Chain::Ethereum, &mnemonic, "")?;
    let protected = derive_wallet(Chain::Ethereum, &mnemonic, "TREZOR")?;
    assert_ne!(plain.public_key, protected.public_key);
    Ok(())
}

#[test]
fn test_generated_wallets_round_trip_encodings() -> anyhow::Result<()> {
    for _ in 0..4 {
        let mnemonic = generate_mnemonic(WordCount::Words12)?;

        let eth = derive_wallet(Chain::Ethereum, &mnemonic, "")?;
        assert!(ethereum::is_valid_checksum_address(&eth.public_key));
        assert_eq!(eth.private_key.len(), 66);

        let sol = derive_wallet(Chain::Solana, &mnemonic, "")?;
        let public = solana::decode_public_key(&sol.public_key)?;
        assert_eq!(sol.private_key.len(), 128);
        assert!(sol.private_key.ends_with(&hex::encode(public)));
    }
    Ok(())
}

#[test]
fn test_invalid_paths_fail() {
    let seed = Seed::from_bytes([1u8; 64]);

    let empty = DerivationPath::new(Vec::new());
    assert!(matches!(
        derive_key_material(&seed, &empty, Curve::Secp256k1),
        Err(Error::InvalidPath(_))
    ));

    let unhardened: DerivationPath = "m/44'/501'/0'/0".parse().unwrap();
    assert!(matches!(
        derive_key_material(&seed, &unhardened, Curve::Ed25519),
        Err(Error::InvalidPath(_))
    ));
}
