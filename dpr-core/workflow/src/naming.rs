//! 桌面命名
//!
//! 新桌面名称为固定前缀加 7 位大写字母数字随机后缀。不与现有
//! 库存做冲突检查，36^7 的空间下碰撞概率可以忽略。

use rand::Rng;

/// 后缀字符集：数字 + 大写字母
pub const NAME_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 随机后缀长度
pub const NAME_SUFFIX_LEN: usize = 7;

/// 生成一个新桌面名称
pub fn generate_machine_name(prefix: &str) -> String {
    generate_machine_name_with(&mut rand::thread_rng(), prefix)
}

/// 使用指定随机源生成名称（测试用）
pub fn generate_machine_name_with<R: Rng>(rng: &mut R, prefix: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + NAME_SUFFIX_LEN);
    name.push_str(prefix);
    for _ in 0..NAME_SUFFIX_LEN {
        let idx = rng.gen_range(0..NAME_CHARSET.len());
        name.push(NAME_CHARSET[idx] as char);
    }
    name
}
