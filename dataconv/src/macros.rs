/// Packs a list of arguments of mixed types.
///
/// Each argument is converted with [`IntoValue`](crate::IntoValue), then the whole list is
/// passed to [`pack`](crate::pack).
///
/// # Example
///
/// ```
/// use dataconv::pack;
///
/// let bytes = pack!("_s!i", 0x7b, 0x12345678).unwrap();
/// assert_eq!(bytes, [0x7b, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12]);
///
/// let bytes = pack!("4C", 65, 66, 67, 68, 69, 70).unwrap();
/// assert_eq!(bytes, b"ABCD");
///
/// let bytes = pack!("z8", "hello").unwrap();
/// assert_eq!(bytes, b"hello\0");
/// ```
#[macro_export]
macro_rules! pack {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::pack(
            $format,
            &[$($crate::IntoValue::to_value(&$arg)),*],
        )
    };
}
