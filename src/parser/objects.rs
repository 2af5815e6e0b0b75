//! Small helpers over lopdf objects.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Follow a reference to its target; other objects are returned as-is.
///
/// A dangling reference resolves to `Object::Null`.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(&Object::Null),
        other => other,
    }
}

/// Look up `key` in `dict` and resolve the value.
pub(crate) fn get<'a>(doc: &'a LopdfDocument, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

/// Look up `key` and resolve it to a dictionary (stream dictionaries included).
pub(crate) fn get_dict<'a>(
    doc: &'a LopdfDocument,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    match get(doc, dict, key)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Resolve an array of numbers; non-numeric entries make the whole array invalid.
pub(crate) fn numbers(doc: &LopdfDocument, obj: &Object) -> Option<Vec<f64>> {
    match resolve(doc, obj) {
        Object::Array(items) => items.iter().map(|o| number(resolve(doc, o))).collect(),
        _ => None,
    }
}

/// Operand list as numbers, skipping anything that is not a number.
pub(crate) fn operand_numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}
