//! Reads a generated index back through `syn`.

fn int(expr: &syn::Expr) -> u64 {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(i), ..
        }) => i.base10_parse().unwrap(),
        _ => panic!("expected an integer literal"),
    }
}

/// Module name, `BIN_DATA` entries and `BIN_DATA_SIZE` of generated source.
pub fn read_index(source: &str) -> (String, Vec<(String, u64, u64)>, u64) {
    let file = syn::parse_file(source).unwrap();
    let syn::Item::Mod(module) = &file.items[0] else {
        panic!("index is not wrapped in a module");
    };
    let mut entries = Vec::new();
    let mut total = None;
    for item in &module.content.as_ref().unwrap().1 {
        let syn::Item::Const(c) = item else { continue };
        if c.ident == "BIN_DATA_SIZE" {
            total = Some(int(&c.expr));
        } else if c.ident == "BIN_DATA" {
            let syn::Expr::Reference(r) = &*c.expr else { panic!("BIN_DATA is not a slice") };
            let syn::Expr::Array(array) = &*r.expr else { panic!("BIN_DATA is not a slice") };
            for elem in &array.elems {
                let syn::Expr::Tuple(t) = elem else { panic!("entry is not a tuple") };
                let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(name), ..
                }) = &t.elems[0]
                else {
                    panic!("entry name is not a string");
                };
                entries.push((name.value(), int(&t.elems[1]), int(&t.elems[2])));
            }
        }
    }
    (module.ident.to_string(), entries, total.expect("BIN_DATA_SIZE is missing"))
}
