use std::{path::Path, process::Command};

use serde_json::{json, Value};

fn run(inventory: &Path, output: &Path) -> bool {
    Command::new(env!("CARGO_BIN_EXE_prepare-scale-inv"))
        .arg("--tf_inv_path")
        .arg(inventory)
        .arg("--scale_cluster_def_path")
        .arg(output)
        .arg("--scale_tuning_profile_file")
        .arg("/opt/IBM/ibm-spectrumscale-cloud-deploy/scale.profile")
        .arg("--verbose")
        .status()
        .expect("Can't start prepare-scale-inv")
        .success()
}

fn multi_az_inventory() -> Value {
    json!({
        "availability_zones": ["us-east-1a", "us-east-1b", "us-east-1c"],
        "compute_instances_by_ip": ["10.0.1.20", "10.0.2.20"],
        "compute_instance_desc_map": {"10.0.3.10": "/dev/xvdh"},
        "storage_instance_disk_map": {
            "10.0.1.10": ["/dev/xvdf", "/dev/xvdg"],
            "10.0.2.10": ["/dev/xvdf", "/dev/xvdg"]
        },
        "filesystem_mountpoint": "/gpfs/fs1",
        "filesystem_block_size": "4M",
        "stack_name": "scale-stack"
    })
}

#[test]
fn writes_same_document_twice() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = dir.path().join("inventory.json");
    std::fs::write(&inventory, multi_az_inventory().to_string()).unwrap();

    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    assert!(run(&inventory, &first));
    assert!(run(&inventory, &second));
    let text = std::fs::read_to_string(&first).unwrap();
    assert_eq!(text, std::fs::read_to_string(&second).unwrap());

    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["scale_cluster"]["scale_sync_replication_config"], "True");
    assert_eq!(value["scale_cluster"]["scale_cluster_profile_name"], "scale");
    assert_eq!(value["scale_storage"][0]["defaultDataReplicas"], 2);
    let nodes = value["node_details"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["scale_nodeclass"], json!(["computedescnodegrp"]));
    // 5 nodes => 3 seats: descriptor node plus both storage nodes.
    assert_eq!(nodes.iter().filter(|n| n["is_quorum_node"] == true).count(), 3);
    assert_eq!(nodes.iter().filter(|n| n["is_gui_server"] == true).count(), 1);
}

#[test]
fn fails_without_output_on_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut value = multi_az_inventory();
    value.as_object_mut().unwrap().remove("filesystem_mountpoint");
    let inventory = dir.path().join("inventory.json");
    std::fs::write(&inventory, value.to_string()).unwrap();

    let output = dir.path().join("out.json");
    assert!(!run(&inventory, &output));
    assert!(!output.exists());

    assert!(!run(&dir.path().join("missing.json"), &output));
    assert!(!output.exists());
}

#[test]
fn verbose_logs_document_and_error_chain() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = dir.path().join("inventory.json");
    std::fs::write(&inventory, multi_az_inventory().to_string()).unwrap();
    let output = dir.path().join("out.json");

    let result = Command::new(env!("CARGO_BIN_EXE_prepare-scale-inv"))
        .arg("--tf_inv_path")
        .arg(&inventory)
        .arg("--scale_cluster_def_path")
        .arg(&output)
        .arg("--scale_tuning_profile_file")
        .arg("scale.profile")
        .arg("--verbose")
        .output()
        .expect("Can't start prepare-scale-inv");
    assert!(result.status.success());
    let log = String::from_utf8_lossy(&result.stderr);
    assert!(log.contains("content of cluster definition: {"), "{log}");
    assert!(log.contains(&std::fs::read_to_string(&output).unwrap()), "{log}");

    let missing = dir.path().join("missing.json");
    let result = Command::new(env!("CARGO_BIN_EXE_prepare-scale-inv"))
        .arg("--tf_inv_path")
        .arg(&missing)
        .arg("--scale_cluster_def_path")
        .arg(&output)
        .arg("--scale_tuning_profile_file")
        .arg("scale.profile")
        .output()
        .expect("Can't start prepare-scale-inv");
    assert!(!result.status.success());
    let log = String::from_utf8_lossy(&result.stderr);
    assert!(log.contains("can't read inventory"), "{log}");
    assert!(log.contains("caused by:"), "{log}");
}
