//! 类别树扁平化
//!
//! DMS 以嵌套树的形式返回类别结构。上传目的地选择界面需要的是
//! 一个带完整路径的平面列表，这里做深度优先展开。

use serde::{Deserialize, Serialize};

/// 类别节点类型标识
pub const ITEM_TYPE_CATEGORY: i32 = 2;

/// 类别树节点（服务端返回的原始结构）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(rename = "ItemNo")]
    pub item_no: i32,
    /// 节点类型，2 = 类别，其他值为文件夹/文档等
    #[serde(rename = "ItemType")]
    pub item_type: i32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ChildItems", default)]
    pub child_items: Vec<CategoryNode>,
}

/// 扁平化后的类别（带完整路径）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatCategory {
    pub item_no: i32,
    pub name: String,
    pub path: String,
}

/// 深度优先展开类别树
///
/// - 父节点先于子节点输出，保持子节点顺序
/// - 路径以 `" / "` 连接祖先节点名称
/// - 非类别节点不输出，但仍会递归其子节点
pub fn flatten_categories(nodes: &[CategoryNode], parent_path: &str) -> Vec<FlatCategory> {
    let mut categories = Vec::new();

    for node in nodes {
        let current_path = if parent_path.is_empty() {
            node.name.clone()
        } else {
            format!("{} / {}", parent_path, node.name)
        };

        if node.item_type == ITEM_TYPE_CATEGORY {
            categories.push(FlatCategory {
                item_no: node.item_no,
                name: node.name.clone(),
                path: current_path.clone(),
            });
        }

        if !node.child_items.is_empty() {
            categories.extend(flatten_categories(&node.child_items, &current_path));
        }
    }

    categories
}
