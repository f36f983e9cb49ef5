use serde_json::{Number, Value};

use super::{Unpack, UnpackError, UnpackPath, unpack_or_reset};

impl Unpack for String {
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
        let Value::String(text) = value else {
            return Err(UnpackError::type_mismatch(path, "string", value));
        };
        self.clone_from(text);
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Unpack for bool {
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
        let Value::Bool(flag) = value else {
            return Err(UnpackError::type_mismatch(path, "boolean", value));
        };
        *self = *flag;
        Ok(())
    }

    fn reset(&mut self) {
        *self = false;
    }
}

impl Unpack for Value {
    fn unpack(&mut self, value: &Value, _path: &mut UnpackPath) -> Result<(), UnpackError> {
        self.clone_from(value);
        Ok(())
    }

    fn reset(&mut self) {
        *self = Value::Null;
    }
}

// Fractional numbers are truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn integer_of(number: &Number) -> Option<i128> {
    if let Some(int) = number.as_i64() {
        return Some(i128::from(int));
    }
    if let Some(int) = number.as_u64() {
        return Some(i128::from(int));
    }
    number
        .as_f64()
        .filter(|float| float.is_finite())
        .map(|float| float.trunc() as i128)
}

macro_rules! unpack_integer {
    ($($ty:ty),+) => {
        $(
            impl Unpack for $ty {
                fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
                    let expected = stringify!($ty);
                    let Value::Number(number) = value else {
                        return Err(UnpackError::type_mismatch(path, expected, value));
                    };
                    let int = integer_of(number)
                        .ok_or_else(|| UnpackError::out_of_range(path, expected))?;
                    *self = <$ty>::try_from(int)
                        .map_err(|_| UnpackError::out_of_range(path, expected))?;
                    Ok(())
                }

                fn reset(&mut self) {
                    *self = 0;
                }
            }
        )+
    };
}

unpack_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! unpack_float {
    ($($ty:ty),+) => {
        $(
            impl Unpack for $ty {
                #[allow(clippy::cast_possible_truncation, trivial_numeric_casts, clippy::unnecessary_cast)]
                fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
                    let expected = stringify!($ty);
                    let Value::Number(number) = value else {
                        return Err(UnpackError::type_mismatch(path, expected, value));
                    };
                    let float = number
                        .as_f64()
                        .ok_or_else(|| UnpackError::out_of_range(path, expected))?;
                    let converted = float as $ty;
                    if converted.is_infinite() && float.is_finite() {
                        return Err(UnpackError::out_of_range(path, expected));
                    }
                    *self = converted;
                    Ok(())
                }

                fn reset(&mut self) {
                    *self = 0.0;
                }
            }
        )+
    };
}

unpack_float!(f32, f64);

impl<T> Unpack for Option<T>
where
    T: Unpack + Default,
{
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        self.get_or_insert_with(T::default).unpack(value, path)
    }

    fn reset(&mut self) {
        *self = None;
    }
}

impl<T> Unpack for Vec<T>
where
    T: Unpack + Default,
{
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
        let Value::Array(items) = value else {
            return Err(UnpackError::type_mismatch(path, "array", value));
        };

        self.clear();
        self.reserve(items.len());
        for (index, item) in items.iter().enumerate() {
            let mut slot = T::default();
            path.push_index(index);
            let result = unpack_or_reset(&mut slot, item, path);
            path.pop();
            result?;
            self.push(slot);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn unpack_into<T>(value: &Value) -> Result<T, UnpackError>
    where
        T: Unpack + Default,
    {
        let mut slot = T::default();
        unpack_or_reset(&mut slot, value, &mut UnpackPath::new())?;
        Ok(slot)
    }

    #[test]
    fn should_truncate_fractional_numbers_into_integers() {
        assert_eq!(unpack_into::<i32>(&json!(41.9)), Ok(41));
        assert_eq!(unpack_into::<i64>(&json!(-3.7)), Ok(-3));
        assert_eq!(unpack_into::<u64>(&json!(u64::MAX)), Ok(u64::MAX));
    }

    #[test]
    fn should_reject_out_of_range_integers() {
        let error = unpack_into::<u8>(&json!(300)).expect_err("should fail");
        insta::assert_snapshot!(error, @"Type mismatch at '': expected u8, got number out of range");

        assert!(unpack_into::<u32>(&json!(-1)).is_err());
    }

    #[test]
    fn should_decode_numbers_into_floats() {
        assert_eq!(unpack_into::<f64>(&json!(3)), Ok(3.0));
        assert_eq!(unpack_into::<f32>(&json!(0.5)), Ok(0.5));
    }

    #[test]
    fn should_reject_out_of_range_floats() {
        let error = unpack_into::<f32>(&json!(1e300)).expect_err("should fail");
        insta::assert_snapshot!(error, @"Type mismatch at '': expected f32, got number out of range");

        assert_eq!(unpack_into::<f64>(&json!(1e300)), Ok(1e300));
        assert_eq!(unpack_into::<f32>(&json!(f64::from(f32::MAX))), Ok(f32::MAX));
    }

    #[test]
    fn should_only_accept_strings_for_string_fields() {
        assert_eq!(unpack_into::<String>(&json!("bob")), Ok("bob".to_string()));

        let error = unpack_into::<String>(&json!(1)).expect_err("should fail");
        assert!(matches!(
            error,
            UnpackError::TypeMismatch { expected: "string", actual: "number", .. }
        ));
    }

    #[test]
    fn should_not_coerce_strings_into_numbers() {
        let error = unpack_into::<i32>(&json!("42")).expect_err("should fail");

        assert!(matches!(
            error,
            UnpackError::TypeMismatch { expected: "i32", actual: "string", .. }
        ));
    }

    #[test]
    fn should_unpack_booleans() {
        assert_eq!(unpack_into::<bool>(&json!(true)), Ok(true));
        assert!(unpack_into::<bool>(&json!("true")).is_err());
    }

    #[test]
    fn should_unpack_sequences_element_by_element() {
        assert_eq!(
            unpack_into::<Vec<Option<i32>>>(&json!([1, null, 3])),
            Ok(vec![Some(1), None, Some(3)])
        );

        let mut path = UnpackPath::new();
        path.push_key("ids");
        let mut ids = vec![9, 9, 9, 9];
        let error = ids
            .unpack(&json!([1, "two"]), &mut path)
            .expect_err("should fail");
        assert_eq!(error.path(), "ids[1]");
    }

    #[test]
    fn should_replace_previous_sequence_content() {
        let mut ids = vec![9, 9, 9];

        ids.unpack(&json!([1]), &mut UnpackPath::new())
            .expect("should unpack");

        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn should_reset_scalars_to_zero() {
        let mut text = "left".to_string();
        let mut int = 5_i32;
        let mut float = 1.5_f64;
        let mut flag = true;
        let mut value = json!({ "a": 1 });

        text.reset();
        int.reset();
        float.reset();
        flag.reset();
        value.reset();

        assert!(text.is_empty());
        assert_eq!(int, 0);
        assert!(float.abs() < f64::EPSILON);
        assert!(!flag);
        assert_eq!(value, Value::Null);
    }
}
