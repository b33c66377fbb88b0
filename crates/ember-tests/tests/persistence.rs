//! Emission node restarts: density persisted in RocksDB carries over, so a
//! restarted node keeps decaying where the previous run stopped.

use std::sync::Arc;

use ember_core::constants::TOKEN;
use ember_core::traits::SingleGovernor;
use ember_core::types::Distribution;
use ember_node_lib::config::NodeConfig;
use ember_node_lib::node::EmissionNode;
use ember_tests::helpers::*;

fn open_node(data_dir: &std::path::Path, token: Arc<MemoryToken>) -> EmissionNode {
    let config = NodeConfig {
        data_dir: data_dir.to_path_buf(),
        ..NodeConfig::default()
    };
    let node = EmissionNode::open(
        config,
        addr(HOLDING),
        Arc::new(SingleGovernor(addr(GOVERNOR))),
        token,
    )
    .unwrap();

    let governor = addr(GOVERNOR);
    node.distributor()
        .set_pool_registry(
            &governor,
            Arc::new(StaticPoolRegistry::new(1).with_pool(addr(POOL), TOKEN, 0)),
        )
        .unwrap();
    node.distributor().allow(&governor, addr(ROUTER)).unwrap();
    node
}

fn reward(node: &EmissionNode, fee: u128) -> Distribution {
    node.distributor()
        .distribute(&addr(ROUTER), &addr(POOL), fee, RESERVE, RESERVE, TOKEN, addr(USER))
        .unwrap()
}

#[test]
fn density_carries_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let token = Arc::new(MemoryToken::new());
    token.add_minter(addr(HOLDING));

    {
        let node = open_node(dir.path(), token.clone());
        for _ in 0..6 {
            reward(&node, TOKEN / 100);
        }
        node.flush().unwrap();
    }

    let node = open_node(dir.path(), token.clone());
    let densities = node.densities().unwrap();
    assert_eq!(densities.len(), 1);
    assert_eq!(densities[0].0, addr(POOL));
    assert_eq!(densities[0].1.cumulative_density, 240 * TOKEN);

    let d = reward(&node, TOKEN / 10);
    assert_eq!(d.density, 640 * TOKEN);
    assert_eq!(d.actual_amount, 380_859_375_000_000_000_000);
}

#[test]
fn node_applies_configured_retention() {
    let dir = tempfile::tempdir().unwrap();
    let token = Arc::new(MemoryToken::new());
    token.add_minter(addr(HOLDING));

    let mut config = NodeConfig {
        data_dir: dir.path().to_path_buf(),
        ..NodeConfig::default()
    };
    config.emission.retention_percent = 50;

    let node = EmissionNode::open(
        config,
        addr(HOLDING),
        Arc::new(SingleGovernor(addr(GOVERNOR))),
        token.clone(),
    )
    .unwrap();
    assert_eq!(node.config().emission.retention_percent, 50);
    assert_eq!(node.distributor().split(40 * TOKEN).unwrap(), (20 * TOKEN, 20 * TOKEN));
}

#[test]
fn invalid_settings_refuse_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = NodeConfig {
        data_dir: dir.path().to_path_buf(),
        ..NodeConfig::default()
    };
    config.emission.tier_breakpoints.pop();

    let result = EmissionNode::open(
        config,
        addr(HOLDING),
        Arc::new(SingleGovernor(addr(GOVERNOR))),
        Arc::new(MemoryToken::new()),
    );
    assert!(result.is_err());
}
