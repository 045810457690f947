use abi_codec::AbiSerializer;
use tracing_subscriber::EnvFilter;

pub const MY_CONTRACT_ABI: &str = include_str!("../data/mycontract.abi.json");
pub const TEST_CONTRACT_ABI: &str = include_str!("../data/test-contract.abi.json");

/// Routes codec logs to the test output. Set `RUST_LOG=abi_codec=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn my_contract() -> AbiSerializer {
    init_tracing();
    AbiSerializer::from_json_str(MY_CONTRACT_ABI).unwrap()
}

#[allow(dead_code)]
pub fn test_contract() -> AbiSerializer {
    init_tracing();
    AbiSerializer::from_json_str(TEST_CONTRACT_ABI).unwrap()
}
