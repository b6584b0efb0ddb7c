//! Structural classification of declared functions.
//!
//! A function is classified against a target type name using only the shape
//! of its signature: the receiver type for instance operations and the
//! result types for constructors. Names never influence the outcome.

use syn::{GenericArgument, PathArguments, ReturnType, Type};
use type2cli_core::OperationKind;

/// Wrapper types that count as one level of indirection.
const INDIRECTION_WRAPPERS: &[&str] = &["Box", "Rc", "Arc", "Option"];

/// A declared type reduced to what classification needs.
///
/// `ident` is the last path segment after peeling references, raw pointers
/// and smart-pointer wrappers; `depth` counts the peeled layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub ident: Option<String>,
    pub depth: usize,
}

impl TypeRef {
    /// Reduces a `syn` type, resolving `Self` to `self_ty` when known.
    pub fn from_type(ty: &Type, self_ty: Option<&str>) -> Self {
        let mut depth = 0;
        let mut current = ty;
        loop {
            match current {
                Type::Reference(r) => {
                    depth += 1;
                    current = &r.elem;
                }
                Type::Ptr(p) => {
                    depth += 1;
                    current = &p.elem;
                }
                Type::Paren(p) => current = &p.elem,
                Type::Group(g) => current = &g.elem,
                Type::Path(path) if path.qself.is_none() => {
                    let Some(segment) = path.path.segments.last() else {
                        return Self { ident: None, depth };
                    };
                    let name = segment.ident.to_string();
                    if INDIRECTION_WRAPPERS.contains(&name.as_str()) {
                        if let Some(inner) = single_type_argument(&segment.arguments) {
                            depth += 1;
                            current = inner;
                            continue;
                        }
                    }
                    let ident = if name == "Self" {
                        self_ty.map(String::from)
                    } else {
                        Some(name)
                    };
                    return Self { ident, depth };
                }
                _ => return Self { ident: None, depth },
            }
        }
    }

    /// Returns `true` if this is `type_name` directly or through one level
    /// of indirection.
    pub fn refers_to(&self, type_name: &str) -> bool {
        self.depth <= 1 && self.ident.as_deref() == Some(type_name)
    }
}

/// Receiver and result shapes of one declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    /// Receiver type when the function takes `self` in any form.
    pub receiver: Option<TypeRef>,
    /// Declared results in order, with `Result` and tuples flattened.
    pub results: Vec<TypeRef>,
}

impl FunctionSignature {
    /// Builds a signature from `syn`, with `self_ty` set for functions
    /// declared inside an `impl` block.
    pub fn from_syn(sig: &syn::Signature, self_ty: Option<&str>) -> Self {
        let receiver = sig
            .receiver()
            .map(|recv| TypeRef::from_type(&recv.ty, self_ty));

        let mut results = Vec::new();
        if let ReturnType::Type(_, ty) = &sig.output {
            flatten_results(ty, self_ty, &mut results);
        }

        Self {
            name: sig.ident.to_string(),
            receiver,
            results,
        }
    }
}

/// Classifies `function` relative to `type_name`.
///
/// # Examples
///
/// ```
/// use type2cli_core::OperationKind;
/// use type2cli_extract::classify::{FunctionSignature, classify};
///
/// let item: syn::ItemFn = syn::parse_str("fn make() -> Box<Bar> { todo!() }").unwrap();
/// let sig = FunctionSignature::from_syn(&item.sig, None);
/// assert_eq!(classify("Bar", &sig), OperationKind::Constructor);
/// assert_eq!(classify("Baz", &sig), OperationKind::Unrelated);
/// ```
pub fn classify(type_name: &str, function: &FunctionSignature) -> OperationKind {
    if let Some(receiver) = &function.receiver {
        return if receiver.refers_to(type_name) {
            OperationKind::Instance
        } else {
            OperationKind::Unrelated
        };
    }

    if function.results.iter().any(|r| r.refers_to(type_name)) {
        OperationKind::Constructor
    } else {
        OperationKind::Unrelated
    }
}

fn flatten_results(ty: &Type, self_ty: Option<&str>, out: &mut Vec<TypeRef>) {
    match ty {
        Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                out.push(TypeRef::from_type(elem, self_ty));
            }
        }
        Type::Paren(p) => flatten_results(&p.elem, self_ty, out),
        Type::Path(path) if path.qself.is_none() => {
            let Some(segment) = path.path.segments.last() else {
                out.push(TypeRef::from_type(ty, self_ty));
                return;
            };
            if segment.ident != "Result" {
                out.push(TypeRef::from_type(ty, self_ty));
                return;
            }
            let PathArguments::AngleBracketed(args) = &segment.arguments else {
                out.push(TypeRef::from_type(ty, self_ty));
                return;
            };
            let mut types = args.args.iter().filter_map(|arg| match arg {
                GenericArgument::Type(t) => Some(t),
                _ => None,
            });
            if let Some(ok) = types.next() {
                flatten_results(ok, self_ty, out);
            }
            if let Some(err) = types.next() {
                out.push(TypeRef::from_type(err, self_ty));
            }
        }
        _ => out.push(TypeRef::from_type(ty, self_ty)),
    }
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let first = types.next()?;
    types.next().is_none().then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_fn(src: &str) -> FunctionSignature {
        let item: syn::ItemFn = syn::parse_str(src).unwrap();
        FunctionSignature::from_syn(&item.sig, None)
    }

    fn method(self_ty: &str, src: &str) -> FunctionSignature {
        let item: syn::ImplItemFn = syn::parse_str(src).unwrap();
        FunctionSignature::from_syn(&item.sig, Some(self_ty))
    }

    #[test]
    fn test_reference_receivers_are_instance() {
        for src in [
            "fn raise(&mut self) {}",
            "fn describe(&self) -> String { todo!() }",
            "fn consume(self) {}",
            "fn boxed(self: Box<Self>) {}",
        ] {
            assert_eq!(
                classify("Bar", &method("Bar", src)),
                OperationKind::Instance,
                "{src}"
            );
        }
    }

    #[test]
    fn test_double_indirection_receiver_is_unrelated() {
        let sig = method("Bar", "fn odd(self: &Box<Self>) {}");
        assert_eq!(classify("Bar", &sig), OperationKind::Unrelated);
    }

    #[test]
    fn test_receiver_of_other_type_is_unrelated() {
        let sig = method("Baz", "fn raise(&mut self) -> Bar { todo!() }");
        assert_eq!(classify("Bar", &sig), OperationKind::Unrelated);
    }

    #[test]
    fn test_constructor_shapes() {
        for src in [
            "fn new() -> Bar { todo!() }",
            "fn with_height(height: i64) -> Bar { todo!() }",
            "fn open(path: &str) -> Result<Bar, std::io::Error> { todo!() }",
            "fn pair() -> (i64, Bar) { todo!() }",
            "fn shared() -> std::sync::Arc<Bar> { todo!() }",
            "fn maybe() -> Option<Bar> { todo!() }",
        ] {
            assert_eq!(
                classify("Bar", &free_fn(src)),
                OperationKind::Constructor,
                "{src}"
            );
        }
    }

    #[test]
    fn test_self_return_in_impl_is_constructor() {
        let sig = method("Bar", "fn new() -> Self { todo!() }");
        assert_eq!(classify("Bar", &sig), OperationKind::Constructor);
    }

    #[test]
    fn test_no_results_is_never_constructor() {
        let sig = free_fn("fn new_bar(height: i64) {}");
        assert_eq!(classify("Bar", &sig), OperationKind::Unrelated);
    }

    #[test]
    fn test_unmatched_results_are_unrelated() {
        // No permissive fallback: some result must name the type.
        let sig = free_fn("fn helper() -> (i64, String) { todo!() }");
        assert_eq!(classify("Bar", &sig), OperationKind::Unrelated);
        let nested = free_fn("fn nested() -> Vec<Bar> { todo!() }");
        assert_eq!(classify("Bar", &nested), OperationKind::Unrelated);
    }

    #[test]
    fn test_result_flattening_keeps_error_slot() {
        let sig = free_fn("fn open() -> Result<(Bar, u8), BarError> { todo!() }");
        let idents: Vec<_> = sig.results.iter().map(|r| r.ident.clone()).collect();
        assert_eq!(
            idents,
            vec![
                Some("Bar".to_string()),
                Some("u8".to_string()),
                Some("BarError".to_string())
            ]
        );
    }

    #[test]
    fn test_classification_is_exclusive() {
        let signatures = [
            method("Bar", "fn raise(&mut self) -> Bar { todo!() }"),
            free_fn("fn new() -> Bar { todo!() }"),
            free_fn("fn unrelated() {}"),
        ];
        let kinds: Vec<_> = signatures.iter().map(|s| classify("Bar", s)).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Instance,
                OperationKind::Constructor,
                OperationKind::Unrelated
            ]
        );
    }
}
