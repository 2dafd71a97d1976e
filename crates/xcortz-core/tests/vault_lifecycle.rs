use std::collections::HashSet;
use std::fs;

use xcortz_core::crypto::key::MIN_MEMORY_KIB;
use xcortz_core::crypto::{derive_key, seal, KdfParams};
use xcortz_core::vault::{FIRST_FILE_VERSION, FORMAT_VERSION, SALT_LENGTH, VERIFICATION_MARKER};
use xcortz_core::{
    add_credential, bump_export_version, create_passkey, create_vault, create_vault_with_params,
    decrypt_credentials, delete_credential, edit_credential, encode_passkey, encode_vault,
    parse_passkey, parse_vault, verify, verify_and_decrypt, CredentialUpdate, NewCredential,
    PasskeyContainer, VaultContainer, VaultError,
};

const MASTER_KEY: &str = "correcthorse";

fn fast_params() -> KdfParams {
    KdfParams::new(MIN_MEMORY_KIB, 1, 1).expect("minimum params should be valid")
}

/// An empty vault at the cheapest cost a vault file may declare.
///
/// `create_vault_with_params` refuses these parameters, so the vault is
/// assembled the way another client could have written it.
fn fresh_vault() -> (PasskeyContainer, VaultContainer) {
    let passkey = create_passkey().expect("passkey creation should succeed");
    let params = fast_params();
    let salt: [u8; SALT_LENGTH] = rand::random();
    let key = derive_key(MASTER_KEY, passkey.secret.as_bytes(), &salt, &params)
        .expect("key derivation should succeed");
    let vault = VaultContainer {
        version: FORMAT_VERSION.to_string(),
        file_version: FIRST_FILE_VERSION,
        kdf: params,
        salt,
        verification: seal(VERIFICATION_MARKER, &key, None).expect("seal should succeed"),
        data: seal(b"[]", &key, None).expect("seal should succeed"),
    };
    (passkey, vault)
}

#[test]
fn test_create_and_unlock_with_default_params() {
    let passkey = create_passkey().expect("passkey creation should succeed");
    let vault = create_vault(MASTER_KEY, &passkey).expect("vault creation should succeed");

    assert_eq!(vault.kdf, KdfParams::V1);
    assert_eq!(vault.file_version, 1);

    let credentials =
        verify_and_decrypt(MASTER_KEY, &passkey, &vault).expect("unlock should succeed");
    assert!(credentials.is_empty());

    let wrong = verify_and_decrypt("wrongpassword", &passkey, &vault);
    assert!(matches!(wrong, Err(VaultError::CredentialVerification)));
}

#[test]
fn test_weak_params_rejected_for_new_vault() {
    let passkey = create_passkey().expect("passkey creation should succeed");
    let result = create_vault_with_params(MASTER_KEY, &passkey, fast_params());
    assert!(matches!(result, Err(VaultError::InvalidInput(_))));

    let (passkey, vault) = fresh_vault();
    let reparsed = parse_vault(&encode_vault(&vault).expect("encode should succeed"))
        .expect("cheap vault files still parse");
    assert_eq!(reparsed.kdf, fast_params());
    assert!(verify_and_decrypt(MASTER_KEY, &passkey, &reparsed).is_ok());
}

#[test]
fn test_add_edit_delete_scenario() {
    let (passkey, vault) = fresh_vault();

    let (credentials, vault) = add_credential(
        &vault,
        &passkey,
        MASTER_KEY,
        NewCredential::new("mail", "work", "p1"),
    )
    .expect("add should succeed");
    assert_eq!(credentials.len(), 1);
    let added = credentials.get(1).expect("credential 1 should exist");
    assert_eq!(added.name, "mail");
    assert_eq!(added.description, "work");
    assert_eq!(added.secret, "p1");
    let created_at = added.created_at;
    let added_updated_at = added.updated_at;

    let (credentials, vault) = edit_credential(
        &vault,
        &passkey,
        MASTER_KEY,
        1,
        CredentialUpdate::new().secret("p2"),
    )
    .expect("edit should succeed");
    let edited = credentials.get(1).expect("credential 1 should exist");
    assert_eq!(edited.name, "mail");
    assert_eq!(edited.description, "work");
    assert_eq!(edited.secret, "p2");
    assert_eq!(edited.created_at, created_at);
    assert!(edited.updated_at > added_updated_at);

    let (credentials, vault) =
        delete_credential(&vault, &passkey, MASTER_KEY, 1).expect("delete should succeed");
    assert!(credentials.is_empty());

    let again = delete_credential(&vault, &passkey, MASTER_KEY, 1);
    assert!(matches!(again, Err(VaultError::CredentialNotFound(1))));
}

#[test]
fn test_ids_not_reused_after_delete() {
    let (passkey, mut vault) = fresh_vault();
    for name in ["a", "b", "c"] {
        let (_, next) = add_credential(
            &vault,
            &passkey,
            MASTER_KEY,
            NewCredential::new(name, "", "secret"),
        )
        .expect("add should succeed");
        vault = next;
    }

    let (_, vault) =
        delete_credential(&vault, &passkey, MASTER_KEY, 2).expect("delete should succeed");
    let (credentials, _) = add_credential(
        &vault,
        &passkey,
        MASTER_KEY,
        NewCredential::new("d", "", "secret"),
    )
    .expect("add should succeed");

    let ids: Vec<u64> = credentials.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn test_file_version_only_moves_on_export() {
    let (passkey, vault) = fresh_vault();
    let (_, vault) = add_credential(
        &vault,
        &passkey,
        MASTER_KEY,
        NewCredential::new("a", "", "secret"),
    )
    .expect("add should succeed");
    assert_eq!(vault.file_version, 1);

    let first = bump_export_version(&vault).expect("export should succeed");
    let second = bump_export_version(&first).expect("export should succeed");
    assert_eq!(first.file_version, 2);
    assert_eq!(second.file_version, 3);

    let (_, edited) = edit_credential(
        &second,
        &passkey,
        MASTER_KEY,
        1,
        CredentialUpdate::new().name("b"),
    )
    .expect("edit should succeed");
    assert_eq!(edited.file_version, 3);
}

#[test]
fn test_single_byte_changes_fail_verification() {
    let (passkey, vault) = fresh_vault();

    assert!(verify("correcthorsf", &passkey, &vault).is_err());

    let mut bytes = *passkey.secret.as_bytes();
    bytes[31] ^= 0x01;
    let other_passkey = PasskeyContainer {
        secret: xcortz_core::vault::PasskeySecret::from_bytes(bytes),
        ..passkey.clone()
    };
    let result = verify(MASTER_KEY, &other_passkey, &vault);
    assert!(matches!(result, Err(VaultError::CredentialVerification)));

    let mut other_salt = vault.clone();
    other_salt.salt[15] ^= 0x01;
    let result = verify(MASTER_KEY, &passkey, &other_salt);
    assert!(matches!(result, Err(VaultError::CredentialVerification)));
}

#[test]
fn test_tampered_data_block_reported_as_corruption() {
    let (passkey, vault) = fresh_vault();
    let mut tampered = vault.clone();
    let last = tampered.data.sealed.len() - 1;
    tampered.data.sealed[last] ^= 0x01;

    let key = verify(MASTER_KEY, &passkey, &tampered).expect("verification should still pass");
    let result = decrypt_credentials(&tampered, &key);
    assert!(matches!(result, Err(VaultError::VaultCorruption(_))));

    let result = verify_and_decrypt(MASTER_KEY, &passkey, &tampered);
    assert!(matches!(result, Err(VaultError::VaultCorruption(_))));
}

#[test]
fn test_every_reseal_uses_a_fresh_nonce() {
    let (passkey, mut vault) = fresh_vault();
    let mut nonces = HashSet::new();
    nonces.insert(vault.verification.nonce);
    nonces.insert(vault.data.nonce);

    for i in 0..5 {
        let (_, next) = add_credential(
            &vault,
            &passkey,
            MASTER_KEY,
            NewCredential::new(format!("site-{}", i), "", "secret"),
        )
        .expect("add should succeed");
        assert!(nonces.insert(next.data.nonce), "nonce reused");
        vault = next;
    }
}

#[test]
fn test_containers_survive_disk_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let (passkey, vault) = fresh_vault();
    let (credentials, vault) = add_credential(
        &vault,
        &passkey,
        MASTER_KEY,
        NewCredential::new("mail", "work", "p1"),
    )
    .expect("add should succeed");

    let passkey_path = dir.path().join("user.passkey");
    let vault_path = dir.path().join("user.vault");
    fs::write(&passkey_path, encode_passkey(&passkey).expect("encode should succeed"))
        .expect("write should succeed");
    fs::write(&vault_path, encode_vault(&vault).expect("encode should succeed"))
        .expect("write should succeed");

    let passkey_text = fs::read_to_string(&passkey_path).expect("read should succeed");
    let vault_text = fs::read_to_string(&vault_path).expect("read should succeed");
    let loaded_passkey = parse_passkey(&passkey_text).expect("parse should succeed");
    let loaded_vault = parse_vault(&vault_text).expect("parse should succeed");

    assert_eq!(loaded_passkey, passkey);
    assert_eq!(loaded_vault, vault);
    let reread = verify_and_decrypt(MASTER_KEY, &loaded_passkey, &loaded_vault)
        .expect("unlock should succeed");
    assert_eq!(reread, credentials);
}

#[test]
fn test_vault_without_kdf_field_uses_v1_params() {
    let (_, vault) = fresh_vault();
    let text = encode_vault(&vault).expect("encode should succeed");

    let mut value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    let object = value.as_object_mut().expect("vault is an object");
    object.remove("kdf");
    object.remove("fileVersion");

    let parsed = parse_vault(&value.to_string()).expect("legacy vault should parse");
    assert_eq!(parsed.kdf, KdfParams::V1);
    assert_eq!(parsed.file_version, 1);
}
