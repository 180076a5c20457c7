#![cfg(feature = "serde")]

use spest::{EstimatorConfig, MatrixCharacteristics, OpCode, TransposeShape};

#[test]
fn test_characteristics_json() {
    let mc = MatrixCharacteristics::new(100, 20, 37);
    let json = serde_json::to_string(&mc).unwrap();
    let back: MatrixCharacteristics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mc);
}

#[test]
fn test_opcode_json() {
    for op in OpCode::ALL {
        let json = serde_json::to_string(&op).unwrap();
        let back: OpCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
    }
}

#[test]
fn test_config_json() {
    let config = EstimatorConfig::sequential()
        .with_block_sizes(16, 8, 4096)
        .with_transpose_shape(TransposeShape::Swap);
    let json = serde_json::to_string(&config).unwrap();
    let back: EstimatorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
