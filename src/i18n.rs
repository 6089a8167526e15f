// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文,用于结果摘要与命令行输出
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 可选语言,首项为默认
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 语言代码归一化: "zh" / "zh_cn" / "en-US" 等写法映射到受支持的语言
pub fn normalize_locale(locale: &str) -> Option<&'static str> {
    let lowered = locale.trim().to_lowercase().replace('_', "-");
    let primary = lowered.split('-').next().unwrap_or("");
    match primary {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

/// 设置语言
///
/// 不支持的语言保持当前设置并返回 false
pub fn set_locale(locale: &str) -> bool {
    match normalize_locale(locale) {
        Some(code) => {
            rust_i18n::set_locale(code);
            true
        }
        None => false,
    }
}

/// 翻译消息并替换 `%{name}` 占位符
///
/// # 示例
/// ```no_run
/// use machining_aps::i18n::t_with_args;
/// let msg = t_with_args("report.assigned", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 同 [`t_with_args`],参数为已格式化的字符串
pub fn t_owned(key: &str, args: &[(&str, String)]) -> String {
    let borrowed: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
    t_with_args(key, &borrowed)
}

/// locale 为全局状态: 依赖语言的单元测试共用此锁串行执行
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("zh_CN"), Some("zh-CN"));
        assert_eq!(normalize_locale("ZH"), Some("zh-CN"));
        assert_eq!(normalize_locale("en-US"), Some("en"));
        assert_eq!(normalize_locale("de"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_unsupported_locale_keeps_current() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(set_locale("en_US"));
        assert_eq!(current_locale(), "en");

        assert!(!set_locale("fr"));
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        assert!(set_locale(SUPPORTED_LOCALES[0]));
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_report_keys_in_both_locales() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("report.procurement", &[("count", "4"), ("late", "1")]);
        assert_eq!(msg, "采购建议: 4（其中延误 1）");

        set_locale("en");
        let msg = t_owned("report.unroutable", &[("count", 3.to_string())]);
        assert_eq!(msg, "Unroutable operations: 3");

        // 恢复默认语言
        set_locale("zh-CN");
    }
}
