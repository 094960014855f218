//! `#[derive(Lexicon)]` for token enums.
//!
//! Every variant lists one or more `#[regex("...")]` or `#[token("...")]`
//! attributes. Patterns are checked while the enum is compiled, so an invalid
//! or unsupported pattern is a build error pointing at its attribute.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use scanlex_compiler::{PatternOptions, parse_pattern};
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Meta, parse_macro_input, spanned::Spanned};

#[proc_macro_derive(Lexicon, attributes(token, regex, lexicon))]
pub fn derive_lexicon(input: TokenStream) -> TokenStream {
    match expand_lexicon(parse_macro_input!(input as DeriveInput)) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct RuleDescriptor {
    variant_ident: syn::Ident,
    pattern: String,
}

fn expand_lexicon(input: DeriveInput) -> syn::Result<TokenStream2> {
    let enum_ident = input.ident;
    let options = parse_options(&input.attrs)?;
    let data_enum = match input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new(
                enum_ident.span(),
                "Lexicon can only be derived for enums",
            ));
        }
    };
    if data_enum.variants.is_empty() {
        return Err(syn::Error::new(
            enum_ident.span(),
            "Lexicon needs at least one variant",
        ));
    }

    let mut rules = Vec::new();
    for variant in &data_enum.variants {
        if !variant.fields.is_empty() {
            return Err(syn::Error::new(
                variant.fields.span(),
                "Lexicon only supports unit variants",
            ));
        }

        let mut found_pattern = false;
        for attr in &variant.attrs {
            let is_token = attr.path().is_ident("token");
            if !is_token && !attr.path().is_ident("regex") {
                continue;
            }
            found_pattern = true;
            let pattern = parse_pattern_attr(attr, is_token)?;
            check_pattern(&pattern, &options, attr)?;
            rules.push(RuleDescriptor {
                variant_ident: variant.ident.clone(),
                pattern,
            });
        }

        if !found_pattern {
            return Err(syn::Error::new(
                variant.ident.span(),
                "each variant needs a #[token(..)] or #[regex(..)] attribute",
            ));
        }
    }

    let variants: Vec<&syn::Ident> = data_enum.variants.iter().map(|v| &v.ident).collect();
    Ok(emit_codegen(&enum_ident, &options, &rules, &variants))
}

fn parse_options(attrs: &[Attribute]) -> syn::Result<PatternOptions> {
    let mut options = PatternOptions::default();
    for attr in attrs {
        if !attr.path().is_ident("lexicon") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("case_insensitive") {
                options.case_insensitive = true;
            } else if meta.path.is_ident("dot_matches_new_line") {
                options.dot_matches_new_line = true;
            } else if meta.path.is_ident("ignore_whitespace") {
                options.ignore_whitespace = true;
            } else if meta.path.is_ident("unicode") {
                options.unicode = if meta.input.peek(syn::Token![=]) {
                    meta.value()?.parse::<syn::LitBool>()?.value
                } else {
                    true
                };
            } else {
                return Err(meta.error("unknown lexicon option"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn parse_pattern_attr(attr: &Attribute, is_token: bool) -> syn::Result<String> {
    let literal = match &attr.meta {
        Meta::List(list) => {
            let args: Punctuated<Expr, syn::Token![,]> =
                list.parse_args_with(Punctuated::parse_terminated)?;
            let mut args = args.iter();
            let literal = match args.next() {
                Some(Expr::Lit(ExprLit {
                    lit: syn::Lit::Str(value),
                    ..
                })) => value.value(),
                Some(other) => {
                    return Err(syn::Error::new(
                        other.span(),
                        "pattern must be provided as string literal",
                    ));
                }
                None => return Err(syn::Error::new(attr.span(), "missing pattern literal")),
            };
            if let Some(extra) = args.next() {
                return Err(syn::Error::new(
                    extra.span(),
                    "expected a single pattern literal",
                ));
            }
            literal
        }
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => lit.value(),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "pattern must be provided as string literal",
                ));
            }
        },
        Meta::Path(_) => {
            return Err(syn::Error::new(
                attr.span(),
                "expected #[token(\"...\")] or #[regex(\"...\")]",
            ));
        }
    };

    if is_token {
        if literal.is_empty() {
            return Err(syn::Error::new(attr.span(), "token literal must not be empty"));
        }
        Ok(escape_literal(&literal))
    } else {
        Ok(literal)
    }
}

fn check_pattern(pattern: &str, options: &PatternOptions, attr: &Attribute) -> syn::Result<()> {
    parse_pattern(pattern, options)
        .and_then(|parsed| parsed.lower())
        .map(|_| ())
        .map_err(|err| syn::Error::new(attr.span(), format!("invalid pattern {pattern:?}: {err}")))
}

// Whitespace is spelled as a hex escape so `ignore_whitespace` keeps it.
fn escape_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        match ch {
            '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
            | '#' | '&' | '-' | '~' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ch if ch.is_whitespace() => {
                escaped.push_str(&format!("\\x{{{:X}}}", ch as u32));
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn emit_codegen(
    enum_ident: &syn::Ident,
    options: &PatternOptions,
    rules: &[RuleDescriptor],
    variants: &[&syn::Ident],
) -> TokenStream2 {
    let PatternOptions {
        case_insensitive,
        dot_matches_new_line,
        unicode,
        ignore_whitespace,
    } = *options;

    let adds = rules.iter().map(|rule| {
        let variant = &rule.variant_ident;
        let pattern = &rule.pattern;
        quote! {
            rules.add(#pattern, #enum_ident::#variant as u32)?;
        }
    });

    let id_arms = variants.iter().map(|variant| {
        quote! { #enum_ident::#variant => #enum_ident::#variant as u32, }
    });

    let from_checks = variants.iter().map(|variant| {
        quote! {
            if id == #enum_ident::#variant as u32 {
                return ::core::option::Option::Some(#enum_ident::#variant);
            }
        }
    });

    quote! {
        impl ::scanlex::Lexicon for #enum_ident {
            fn rule_set() -> ::core::result::Result<::scanlex::RuleSet, ::scanlex::RuleError> {
                let mut rules = ::scanlex::RuleSet::with_options(::scanlex::PatternOptions {
                    case_insensitive: #case_insensitive,
                    dot_matches_new_line: #dot_matches_new_line,
                    unicode: #unicode,
                    ignore_whitespace: #ignore_whitespace,
                });
                #(#adds)*
                ::core::result::Result::Ok(rules)
            }

            fn token_id(self) -> u32 {
                match self {
                    #(#id_arms)*
                }
            }

            fn from_token_id(id: u32) -> ::core::option::Option<Self> {
                #(#from_checks)*
                ::core::option::Option::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        match expand_lexicon(input) {
            Err(err) => err.to_string(),
            Ok(tokens) => panic!("expected an error, got {tokens}"),
        }
    }

    #[test]
    fn rejects_structs() {
        let err = expand_err(parse_quote! {
            struct NotAnEnum;
        });
        assert!(err.contains("only be derived for enums"), "{err}");
    }

    #[test]
    fn rejects_variants_with_fields() {
        let err = expand_err(parse_quote! {
            enum Kind {
                #[regex("[0-9]+")]
                Number(u32),
            }
        });
        assert!(err.contains("unit variants"), "{err}");
    }

    #[test]
    fn rejects_variant_without_pattern() {
        let err = expand_err(parse_quote! {
            enum Kind {
                #[regex("[0-9]+")]
                Number,
                Other,
            }
        });
        assert!(err.contains("#[token(..)] or #[regex(..)]"), "{err}");
    }

    #[test]
    fn rejects_empty_enum() {
        let err = expand_err(parse_quote! {
            enum Kind {}
        });
        assert!(err.contains("at least one variant"), "{err}");
    }

    #[test]
    fn rejects_invalid_and_unsupported_patterns() {
        let err = expand_err(parse_quote! {
            enum Kind {
                #[regex("[a-")]
                Broken,
            }
        });
        assert!(err.contains("invalid pattern"), "{err}");

        let err = expand_err(parse_quote! {
            enum Kind {
                #[regex("^start")]
                Anchored,
            }
        });
        assert!(err.contains("unsupported"), "{err}");
    }

    #[test]
    fn rejects_unknown_option() {
        let err = expand_err(parse_quote! {
            #[lexicon(multi_line)]
            enum Kind {
                #[token("x")]
                X,
            }
        });
        assert!(err.contains("unknown lexicon option"), "{err}");
    }

    #[test]
    fn emits_one_rule_per_attribute() {
        let tokens = expand_lexicon(parse_quote! {
            #[lexicon(case_insensitive)]
            enum Kind {
                #[token("if")]
                #[token("when")]
                Keyword = 7,
                #[regex("[a-z]+")]
                Ident,
            }
        })
        .expect("valid lexicon");
        let text = tokens.to_string();
        assert_eq!(text.matches("rules . add").count(), 3, "{text}");
        assert!(text.contains("case_insensitive : true"), "{text}");
    }

    #[test]
    fn unicode_option_takes_a_bool() {
        let input: DeriveInput = parse_quote! {
            #[lexicon(unicode = false, ignore_whitespace)]
            enum Kind {
                #[regex(r"\w+")]
                Word,
            }
        };
        let options = parse_options(&input.attrs).expect("options parse");
        assert!(!options.unicode);
        assert!(options.ignore_whitespace);

        let text = expand_lexicon(input).expect("valid lexicon").to_string();
        assert!(text.contains("unicode : false"), "{text}");
    }

    #[test]
    fn ascii_lexicon_rejects_dot() {
        let err = expand_err(parse_quote! {
            #[lexicon(unicode = false)]
            enum Kind {
                #[regex(".")]
                Any,
            }
        });
        assert!(err.contains("invalid pattern"), "{err}");
    }

    #[test]
    fn token_literals_are_escaped() {
        assert_eq!(escape_literal("a+b"), r"a\+b");
        assert_eq!(escape_literal("->"), r"\->");
        assert_eq!(escape_literal("a b"), r"a\x{20}b");
        assert_eq!(escape_literal("\n"), r"\x{A}");
    }
}
