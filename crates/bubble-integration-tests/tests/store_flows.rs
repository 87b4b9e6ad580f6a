//! # Store Flows
//!
//! Label stores written through the CLI handlers, reloaded from disk and
//! used for resolution, the way consecutive `bubble` invocations see them.

use bubble_cli::addresses::{run_addresses, AddressesArgs, AddressesCommand};
use bubble_cli::config::{ChainProvider, ToolsConfig};
use bubble_cli::did::{build_identifier, run_did, DidArgs, DidCommand};
use bubble_cli::providers::{run_providers, ProvidersArgs, ProvidersCommand};
use bubble_cli::wallet::{run_wallet, WalletArgs, WalletCommand};
use bubble_cli::LabelStores;
use bubble_registry::{AddressBook, StoreError};

fn workspace() -> (tempfile::TempDir, ToolsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolsConfig {
        app_dir: dir.path().join(".bubble-tools"),
    };
    (dir, config)
}

fn add_address(config: &ToolsConfig, label: &str, address: &str) {
    let args = AddressesArgs {
        command: AddressesCommand::Add {
            label: label.to_string(),
            address: address.to_string(),
            memo: None,
            lowercase: false,
        },
    };
    run_addresses(&args, config).unwrap();
}

#[test]
fn labels_written_by_one_run_resolve_in_the_next() {
    let (_dir, config) = workspace();
    add_address(&config, "address1", "0x1111111111111111111111111111111111111111");
    add_address(&config, "address2", "0x2222222222222222222222222222222222222222");
    run_wallet(
        &WalletArgs {
            command: WalletCommand::Import {
                label: "key3".to_string(),
                address: "0x3333333333333333333333333333333333333333".to_string(),
                public_key: None,
            },
        },
        &config,
    )
    .unwrap();
    run_providers(
        &ProvidersArgs {
            command: ProvidersCommand::Add {
                label: "server1".to_string(),
                url: "https://server1.com/path1/".to_string(),
                id: "address2".to_string(),
            },
        },
        &config,
    )
    .unwrap();

    let stores = LabelStores::load(&config).unwrap();
    let id = build_identifier(&stores, "address1", Some("server1"), Some("key3")).unwrap();
    assert_eq!(
        id.to_did(),
        "did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG\
         ?vault=LYyeMWjMTD9CJkrtKGVBu3Gcv6QSrmbZFFvJcEHQx4TnAyoLXAug9ZCFNUD82fY1Z5THNiAUt45dfXQePPZRUHJfL2\
         &file=iNYnrxVbsERC6CNW55P76PHi4nn"
    );
}

#[test]
fn address_book_file_is_sorted_json() {
    let (_dir, config) = workspace();
    add_address(&config, "Zed", "0x1111111111111111111111111111111111111111");
    add_address(&config, "amy", "0x2222222222222222222222222222222222222222");

    let raw = std::fs::read_to_string(config.addresses_file()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let labels: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["amy", "zed"]);
    assert!(json[0].get("memo").is_none());
}

#[test]
fn address_from_did_stores_contract() {
    let (_dir, config) = workspace();
    add_address(&config, "nft", "did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG?file=iNYnrxVbsERC6CNW55P76PHi4nn");
    let book = config.address_book().unwrap();
    assert_eq!(
        book.get("NFT").unwrap().address.as_str(),
        "0x1111111111111111111111111111111111111111"
    );
}

#[test]
fn duplicate_provider_url_is_rejected_across_runs() {
    let (_dir, config) = workspace();
    let add = |label: &str, url: &str| ProvidersArgs {
        command: ProvidersCommand::Add {
            label: label.to_string(),
            url: url.to_string(),
            id: "0x2222222222222222222222222222222222222222".to_string(),
        },
    };
    run_providers(&add("one", "https://server1.com/"), &config).unwrap();
    let err = run_providers(&add("two", "HTTPS://SERVER1.COM/"), &config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::DuplicateUrl(_))
    ));
}

#[test]
fn corrupt_store_file_is_reported() {
    let (_dir, config) = workspace();
    std::fs::create_dir_all(&config.app_dir).unwrap();
    std::fs::write(config.addresses_file(), "{ not json").unwrap();
    assert!(matches!(
        AddressBook::load(&config.addresses_file()),
        Err(StoreError::Json { .. })
    ));
    assert!(LabelStores::load(&config).is_err());
}

#[test]
fn decode_writes_provider_template_only_into_existing_dir() {
    let (_dir, config) = workspace();
    let decode = DidArgs {
        command: DidCommand::Decode {
            did: "did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG".to_string(),
            json: false,
        },
    };
    run_did(&decode, &config).unwrap();
    assert!(!config.app_dir.exists());

    std::fs::create_dir_all(&config.app_dir).unwrap();
    run_did(&decode, &config).unwrap();
    assert_eq!(
        ChainProvider::load(&config.app_dir).unwrap(),
        ChainProvider::bubblenet()
    );
    assert!(config.provider_file().exists());
}
