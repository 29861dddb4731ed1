use super::{scheme::scheme_base_url, SwapInterceptor};

/// Page script that reroutes matching `fetch`, XHR, element URL properties,
/// `setAttribute`, `new Audio` and parser-inserted elements to the swap
/// scheme. The script only tests patterns; the file is chosen on the Rust
/// side by the window's interceptor.
pub(crate) fn request_shim_script(interceptor: &SwapInterceptor, scheme: &str) -> String {
    let rules: Vec<(&str, &str)> = interceptor
        .patterns()
        .map(|pattern| (pattern.host(), pattern.path_regex_source()))
        .collect();
    let rules_json = serde_json::to_string(&rules).unwrap_or_else(|_| "[]".to_string());
    let base_json = serde_json::to_string(&scheme_base_url(scheme))
        .unwrap_or_else(|_| "\"\"".to_string());

    SHIM_TEMPLATE
        .replace("__SWAP_RULES__", &rules_json)
        .replace("__SWAP_BASE__", &base_json)
}

const SHIM_TEMPLATE: &str = r#"(() => {
  if (window.__idkrSwapInstalled) return;
  window.__idkrSwapInstalled = true;
  const rules = __SWAP_RULES__.map(([host, source]) => [host, new RegExp(source)]);
  const base = __SWAP_BASE__;
  const swapUrl = (input) => {
    try {
      const url = new URL(String(input), location.href);
      if (url.protocol !== "http:" && url.protocol !== "https:") return null;
      const pathAndQuery = url.pathname + url.search;
      for (const [host, pattern] of rules) {
        if (url.hostname === host && pattern.test(pathAndQuery)) {
          return base + "?url=" + encodeURIComponent(url.href);
        }
      }
    } catch (_) {}
    return null;
  };

  const nativeFetch = window.fetch;
  window.fetch = function (input, init) {
    const raw = input instanceof Request ? input.url : input;
    const swapped = swapUrl(raw);
    return nativeFetch.call(this, swapped ?? input, init);
  };

  const nativeOpen = XMLHttpRequest.prototype.open;
  XMLHttpRequest.prototype.open = function (method, url, ...rest) {
    return nativeOpen.call(this, method, swapUrl(url) ?? url, ...rest);
  };

  const urlProperties = [
    [HTMLImageElement, "src"],
    [HTMLScriptElement, "src"],
    [HTMLMediaElement, "src"],
    [HTMLSourceElement, "src"],
    [HTMLVideoElement, "poster"],
    [HTMLLinkElement, "href"],
  ];
  for (const [ctor, property] of urlProperties) {
    const descriptor = Object.getOwnPropertyDescriptor(ctor.prototype, property);
    if (!descriptor || !descriptor.set) continue;
    Object.defineProperty(ctor.prototype, property, {
      ...descriptor,
      set(value) {
        descriptor.set.call(this, swapUrl(value) ?? value);
      },
    });
  }

  const swappedAttribute = (element, name) => {
    const attribute = String(name).toLowerCase();
    return urlProperties.some(
      ([ctor, property]) => property === attribute && element instanceof ctor
    );
  };
  const nativeSetAttribute = Element.prototype.setAttribute;
  Element.prototype.setAttribute = function (name, value) {
    const swapped = swappedAttribute(this, name) ? swapUrl(value) : null;
    return nativeSetAttribute.call(this, name, swapped ?? value);
  };

  const NativeAudio = window.Audio;
  window.Audio = function Audio(src) {
    return src === undefined ? new NativeAudio() : new NativeAudio(swapUrl(src) ?? src);
  };
  window.Audio.prototype = NativeAudio.prototype;

  // Elements created by the HTML parser never pass through the setters above.
  const rewriteElement = (element) => {
    for (const [ctor, property] of urlProperties) {
      if (!(element instanceof ctor)) continue;
      const current = element.getAttribute(property);
      const swapped = current && swapUrl(current);
      if (swapped) nativeSetAttribute.call(element, property, swapped);
    }
  };
  new MutationObserver((records) => {
    for (const record of records) {
      for (const node of record.addedNodes) {
        if (!(node instanceof Element)) continue;
        rewriteElement(node);
        node.querySelectorAll("img,script,audio,video,source,link").forEach(rewriteElement);
      }
    }
  }).observe(document, { childList: true, subtree: true });
})();
"#;
