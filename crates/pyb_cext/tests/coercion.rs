mod common;

use common::Indexable;
use num_bigint::BigInt;
use pyb_cext::cast_to_index;
use pyb_core::{BridgeError, PyObject, Value};

struct Plain;
impl PyObject for Plain {
    fn type_name(&self) -> &str {
        "Plain"
    }
}

#[test]
fn int_kinds_coerce() {
    assert_eq!(cast_to_index(&Value::from_i64(-7)), Ok(-7));
    assert_eq!(cast_to_index(&Value::from_bool(true)), Ok(1));
    assert_eq!(cast_to_index(&Value::from_bool(false)), Ok(0));
    assert_eq!(cast_to_index(&Value::from_bigint(BigInt::from(i64::MIN))), Ok(i64::MIN));
}

#[test]
fn oversized_bigint_overflows() {
    let big = BigInt::from(i64::MAX) + 1;
    assert_eq!(
        cast_to_index(&Value::from_bigint(big)),
        Err(BridgeError::IndexOverflow { type_name: "int".into() })
    );
}

#[test]
fn non_index_values_fail() {
    for (value, name) in [
        (Value::from_f64(1.0), "float"),
        (Value::from_str("1"), "str"),
        (Value::None, "NoneType"),
        (Value::object(Plain), "Plain"),
    ] {
        assert_eq!(cast_to_index(&value), Err(BridgeError::TypeCoercion { type_name: name.into() }));
    }
}

#[test]
fn index_hook_is_honoured() {
    assert_eq!(cast_to_index(&Value::object(Indexable(Value::from_i64(42)))), Ok(42));
    assert_eq!(
        cast_to_index(&Value::object(Indexable(Value::from_f64(4.2)))),
        Err(BridgeError::TypeCoercion { type_name: "float".into() })
    );
}
