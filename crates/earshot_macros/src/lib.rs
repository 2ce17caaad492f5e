use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitInt};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The function body is wrapped with a drop guard that reports how long the
/// call took once it returns, including early returns through `?`. Calls that
/// finish under the threshold stay silent. Without `perf_stats` the guard is
/// compiled out entirely.
///
/// # Example
/// ```ignore
/// #[profile]
/// pub fn build(radius: f64, source: &MapSource) -> Result<Self, MapError> {
///     // ... work ...
/// }
///
/// #[profile(5)] // only report calls slower than 5ms
/// pub fn compute_spt(&self, source: NodeId) -> Result<PathTree, GraphError> { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Threshold in milliseconds; 0 reports every call.
    let threshold_ms: u128 = if attr.is_empty() {
        0
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        match lit.base10_parse() {
            Ok(ms) => ms,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let should_report = if threshold_ms == 0 {
        quote! { true }
    } else {
        quote! { elapsed.as_millis() >= #threshold_ms }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        if #should_report {
                            bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
                        }
                    }
                }
                ProfileGuard {
                    name: concat!(module_path!(), "::", #fn_name_str),
                    start: std::time::Instant::now(),
                }
            };

            #block
        }
    };

    output.into()
}
