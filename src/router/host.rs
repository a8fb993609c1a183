//! 宿主路由接口
//!
//! 注册管理器只通过这个 trait 与外部路由表交互。

use crate::models::EndpointDefinition;

/// 宿主路由表提供的能力
pub trait RouteHost {
    /// 注册一条路由，同一路径重复注册时由宿主决定覆盖方式
    fn register_route(&mut self, namespace: &str, route: &str, definition: &EndpointDefinition);

    /// URL 根地址
    fn url_root(&self) -> &str;

    /// 构建端点的完整 URL
    fn build_url(&self, namespace: &str, route: &str) -> String {
        build_endpoint_url(self.url_root(), namespace, route)
    }
}

/// 以单个 `/` 拼接根地址、命名空间与路由
pub fn build_endpoint_url(root: &str, namespace: &str, route: &str) -> String {
    let root = root.trim_end_matches('/');
    let namespace = namespace.trim_matches('/');
    let route = route.strip_prefix('/').unwrap_or(route);

    [root, namespace, route]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticHost;

    impl RouteHost for StaticHost {
        fn register_route(&mut self, _: &str, _: &str, _: &EndpointDefinition) {}

        fn url_root(&self) -> &str {
            "https://example.com/wp-json/"
        }
    }

    #[test]
    fn test_build_endpoint_url() {
        assert_eq!(
            build_endpoint_url("http://localhost:8999", "shop/v1", "/items"),
            "http://localhost:8999/shop/v1/items"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8999/", "/shop/v1/", "items"),
            "http://localhost:8999/shop/v1/items"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8999", "shop/v1", ""),
            "http://localhost:8999/shop/v1"
        );
    }

    #[test]
    fn test_default_build_url_uses_root() {
        assert_eq!(
            StaticHost.build_url("shop/v1", "/orders/recent"),
            "https://example.com/wp-json/shop/v1/orders/recent"
        );
    }
}
