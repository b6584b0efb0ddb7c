//! Schema extraction from Rust source.
//!
//! Each source unit is parsed with [`syn`] and walked once to collect every
//! declared function (free functions, inherent methods, and optionally
//! trait-impl methods) as plain [`FunctionRecord`]s. Records are then
//! classified against a target type name to build a [`TypeSchema`].
//!
//! Parsing runs in parallel across units; classification and schema assembly
//! run afterwards in unit order, so the result is independent of scheduling.
//!
//! # Example
//!
//! ```
//! use type2cli_extract::{SourceUnit, extract};
//!
//! let src = r#"
//!     pub struct Bar { height: i64 }
//!
//!     impl Bar {
//!         /// Raise the bar by the given amount
//!         pub fn raise_by(&mut self, amount: i64) { self.height += amount; }
//!     }
//! "#;
//! let schema = extract("Bar", &[SourceUnit::new("bar.rs", src)]).unwrap();
//! let op = schema.operation("raise_by").unwrap();
//! assert_eq!(op.argument_names, vec!["amount".to_string()]);
//! assert_eq!(op.documentation, "Raise the bar by the given amount");
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use syn::ext::IdentExt;
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, FnArg, Lit, Meta, Pat, PathArguments, Type, Visibility};
use tracing::{debug, info, warn};
use type2cli_core::{
    OperationDescriptor, OperationKind, ParamDescriptor, ParamKind, SchemaPackage, TypeSchema,
};

use crate::classify::{FunctionSignature, classify};
use crate::error::{ExtractError, Result};

/// Type names that mark a leading parameter as context-like.
pub const CONTEXT_TYPE_NAMES: &[&str] = &["InvocationContext", "CancellationToken"];

const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// One file of Rust source to scan.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads a unit from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(Self::new(path, text))
    }
}

/// Options controlling which declarations are considered.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Also consider methods declared in `impl Trait for Type` blocks.
    pub include_trait_impls: bool,
    /// Only consider `pub` functions.
    pub public_only: bool,
}

/// A declared function reduced to owned, thread-safe data.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    pub signature: FunctionSignature,
    /// Non-receiver parameters in declaration order.
    pub params: Vec<ParamDescriptor>,
    pub documentation: String,
    pub is_public: bool,
    pub in_trait_impl: bool,
    pub path: PathBuf,
}

/// Parses every unit and returns the collected functions in unit order.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] for the first unit that does not parse.
pub fn collect_functions(units: &[SourceUnit]) -> Result<Vec<FunctionRecord>> {
    let per_unit: Vec<Vec<FunctionRecord>> = units
        .par_iter()
        .map(|unit| {
            let file = syn::parse_file(&unit.text)
                .map_err(|e| ExtractError::parse(&unit.path, &e))?;
            let mut collector = FunctionCollector {
                path: &unit.path,
                records: Vec::new(),
            };
            collector.visit_file(&file);
            debug!(
                path = %unit.path.display(),
                functions = collector.records.len(),
                "Scanned source unit"
            );
            Ok(collector.records)
        })
        .collect::<Result<_>>()?;

    Ok(per_unit.into_iter().flatten().collect())
}

/// Extracts the schema for `type_name` with default options.
pub fn extract(type_name: &str, units: &[SourceUnit]) -> Result<TypeSchema> {
    extract_with_options(type_name, units, &ExtractOptions::default())
}

/// Extracts the schema for `type_name`.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] if any unit fails to parse; no partial
/// schema is produced.
pub fn extract_with_options(
    type_name: &str,
    units: &[SourceUnit],
    options: &ExtractOptions,
) -> Result<TypeSchema> {
    let records = collect_functions(units)?;
    Ok(schema_from_records(type_name, &records, options))
}

/// Extracts schemas for several types, parsing each unit only once.
pub fn extract_package(
    type_names: &[String],
    units: &[SourceUnit],
    options: &ExtractOptions,
) -> Result<SchemaPackage> {
    if type_names.is_empty() {
        return Err(ExtractError::InvalidInput(
            "No type names were provided".to_string(),
        ));
    }

    let records = collect_functions(units)?;
    let mut package = SchemaPackage::new(type2cli_core::SCHEMA_CONTRACT_VERSION);
    for type_name in type_names {
        package
            .schemas
            .push(schema_from_records(type_name, &records, options));
    }
    package.sort();
    Ok(package)
}

/// Reads `paths` and extracts the schema for `type_name`.
pub fn extract_from_paths(type_name: &str, paths: &[PathBuf]) -> Result<TypeSchema> {
    let units = paths
        .iter()
        .map(SourceUnit::read)
        .collect::<Result<Vec<_>>>()?;
    extract(type_name, &units)
}

/// Classifies collected records against `type_name`.
///
/// When two accepted functions share a name, the later one wins.
pub fn schema_from_records(
    type_name: &str,
    records: &[FunctionRecord],
    options: &ExtractOptions,
) -> TypeSchema {
    let mut schema = TypeSchema::new(type_name);

    for record in records {
        if record.in_trait_impl && !options.include_trait_impls {
            continue;
        }
        if options.public_only && !record.is_public {
            continue;
        }

        let kind = classify(type_name, &record.signature);
        if kind == OperationKind::Unrelated {
            continue;
        }

        let mut op = OperationDescriptor::new(&record.signature.name, kind)
            .with_documentation(record.documentation.clone());
        for param in &record.params {
            op = op.with_param(param.clone());
        }

        debug!(
            type_name,
            operation = %op.name,
            kind = %kind,
            arguments = op.argument_names.len(),
            "Accepted operation"
        );
        if let Some(previous) = schema.insert(op) {
            warn!(
                type_name,
                operation = %previous.name,
                path = %record.path.display(),
                "Operation declared more than once; keeping the later declaration"
            );
        }
    }

    info!(
        type_name,
        operations = schema.operations.len(),
        constructors = schema.constructors().count(),
        "Extracted type schema"
    );
    schema
}

/// Fails if any operation in `schema` lacks documentation.
pub fn ensure_documented(schema: &TypeSchema) -> Result<()> {
    let missing: Vec<String> = schema
        .operations
        .values()
        .filter(|op| op.is_undocumented())
        .map(|op| op.name.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::MissingDocumentation {
            type_name: schema.type_name.clone(),
            operations: missing,
        })
    }
}

struct FunctionCollector<'a> {
    path: &'a Path,
    records: Vec<FunctionRecord>,
}

impl FunctionCollector<'_> {
    fn push(
        &mut self,
        sig: &syn::Signature,
        attrs: &[Attribute],
        vis: &Visibility,
        self_ty: Option<&str>,
        outer_generics: &HashSet<String>,
        in_trait_impl: bool,
    ) {
        let mut generics = outer_generics.clone();
        generics.extend(type_param_names(&sig.generics));

        let params = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(pat_type) => Some(pat_type),
                FnArg::Receiver(_) => None,
            })
            .enumerate()
            .map(|(position, pat_type)| {
                let name = param_name(&pat_type.pat, position);
                let mut param = ParamDescriptor::new(name);
                if position == 0 && is_context_type(&pat_type.ty) {
                    param = param.as_context();
                } else if let Some(kind) = infer_kind(&pat_type.ty, &generics) {
                    param = param.with_kind(kind);
                }
                param
            })
            .collect();

        self.records.push(FunctionRecord {
            signature: FunctionSignature::from_syn(sig, self_ty),
            params,
            documentation: doc_text(attrs),
            is_public: in_trait_impl || matches!(vis, Visibility::Public(_)),
            in_trait_impl,
            path: self.path.to_path_buf(),
        });
    }
}

impl<'ast> Visit<'ast> for FunctionCollector<'_> {
    fn visit_item_fn(&mut self, item: &'ast syn::ItemFn) {
        self.push(
            &item.sig,
            &item.attrs,
            &item.vis,
            None,
            &HashSet::new(),
            false,
        );
    }

    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        let self_ty = impl_self_name(&item.self_ty);
        let generics: HashSet<String> = type_param_names(&item.generics).collect();
        let in_trait_impl = item.trait_.is_some();

        for impl_item in &item.items {
            if let syn::ImplItem::Fn(method) = impl_item {
                self.push(
                    &method.sig,
                    &method.attrs,
                    &method.vis,
                    self_ty.as_deref(),
                    &generics,
                    in_trait_impl,
                );
            }
        }
    }

    fn visit_item_mod(&mut self, item: &'ast syn::ItemMod) {
        if is_cfg_test(&item.attrs) {
            return;
        }
        visit::visit_item_mod(self, item);
    }

    // Only module-level functions count; bodies of these items are skipped.
    fn visit_item_trait(&mut self, _: &'ast syn::ItemTrait) {}
    fn visit_item_const(&mut self, _: &'ast syn::ItemConst) {}
    fn visit_item_static(&mut self, _: &'ast syn::ItemStatic) {}
}

/// Concatenates doc attributes, one line per comment line.
fn doc_text(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .flat_map(|value| {
            value
                .lines()
                .map(|line| {
                    line.trim_start_matches(|c: char| c == '/' || c.is_whitespace())
                        .trim_end()
                        .to_string()
                })
                .collect::<Vec<_>>()
        })
        .collect();

    lines.join("\n").trim_matches('\n').to_string()
}

fn param_name(pat: &Pat, position: usize) -> String {
    let mut idents = Vec::new();
    pattern_idents(pat, &mut idents);
    if idents.is_empty() {
        format!("arg{position}")
    } else {
        idents.join("_")
    }
}

fn pattern_idents(pat: &Pat, out: &mut Vec<String>) {
    match pat {
        Pat::Ident(p) => out.push(p.ident.unraw().to_string()),
        Pat::Tuple(p) => p.elems.iter().for_each(|e| pattern_idents(e, out)),
        Pat::TupleStruct(p) => p.elems.iter().for_each(|e| pattern_idents(e, out)),
        Pat::Struct(p) => p.fields.iter().for_each(|f| pattern_idents(&f.pat, out)),
        Pat::Reference(p) => pattern_idents(&p.pat, out),
        Pat::Paren(p) => pattern_idents(&p.pat, out),
        Pat::Type(p) => pattern_idents(&p.pat, out),
        _ => {}
    }
}

fn is_context_type(ty: &Type) -> bool {
    match ty {
        Type::Reference(r) => is_context_type(&r.elem),
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|s| CONTEXT_TYPE_NAMES.iter().any(|name| s.ident == *name)),
        _ => false,
    }
}

/// Infers the argument kind of a declared parameter type.
///
/// Returns `None` for generic parameters and `impl Trait` arguments.
fn infer_kind(ty: &Type, generics: &HashSet<String>) -> Option<ParamKind> {
    match ty {
        Type::Reference(r) => infer_kind(&r.elem, generics),
        Type::Paren(p) => infer_kind(&p.elem, generics),
        Type::Group(g) => infer_kind(&g.elem, generics),
        Type::Slice(s) if is_u8(&s.elem) => Some(ParamKind::Bytes),
        Type::Array(a) if is_u8(&a.elem) => Some(ParamKind::Bytes),
        Type::ImplTrait(_) | Type::Infer(_) => None,
        Type::Path(path) => {
            let segment = path.path.segments.last()?;
            let name = segment.ident.to_string();
            if path.path.segments.len() == 1 && generics.contains(&name) {
                return None;
            }
            match name.as_str() {
                "String" | "str" | "Cow" | "PathBuf" | "Path" | "OsString" => {
                    Some(ParamKind::String)
                }
                "bool" => Some(ParamKind::Boolean),
                n if INTEGER_TYPES.contains(&n) => Some(ParamKind::Integer),
                "Vec" if first_type_argument(&segment.arguments).is_some_and(is_u8) => {
                    Some(ParamKind::Bytes)
                }
                "Box" => match first_type_argument(&segment.arguments) {
                    Some(inner) => infer_kind(inner, generics),
                    None => Some(ParamKind::Structured),
                },
                _ => Some(ParamKind::Structured),
            }
        }
        _ => Some(ParamKind::Structured),
    }
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.is_ident("u8"))
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

fn type_param_names(generics: &syn::Generics) -> impl Iterator<Item = String> + '_ {
    generics.type_params().map(|p| p.ident.to_string())
}

fn impl_self_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        Type::Paren(p) => impl_self_name(&p.elem),
        Type::Group(g) => impl_self_name(&g.elem),
        _ => None,
    }
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .meta
                .require_list()
                .is_ok_and(|list| list.tokens.to_string().trim() == "test")
    })
}
