//! WPGraphQL documents
//!
//! Works assume a `work` custom post type exposed as `works`/`workBy` with an
//! ACF field group named `workFields`.

/// Published posts, cards plus author and tags
pub const GET_POSTS: &str = r"
query GetPosts($first: Int = 100, $after: String) {
  posts(first: $first, after: $after, where: { status: PUBLISH }) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      title
      slug
      date
      excerpt(format: RENDERED)
      featuredImage { node { sourceUrl altText } }
      author { node { name } }
      categories { nodes { name } }
      tags { nodes { name } }
    }
  }
}
";

/// Single post with rendered content
pub const GET_POST_BY_SLUG: &str = r"
query GetPostBySlug($slug: String!) {
  postBy(slug: $slug) {
    databaseId
    title
    slug
    date
    content(format: RENDERED)
    excerpt(format: RENDERED)
    featuredImage { node { sourceUrl altText } }
    author { node { name } }
    categories { nodes { name } }
    tags { nodes { name } }
  }
}
";

/// Published works
pub const GET_WORKS: &str = r"
query GetWorks($first: Int = 100, $after: String) {
  works(first: $first, after: $after, where: { status: PUBLISH }) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      title
      slug
      date
      featuredImage { node { sourceUrl altText } }
      workFields { client year type category description featured tags }
    }
  }
}
";

/// Single work with the case-study fields
pub const GET_WORK_BY_SLUG: &str = r"
query GetWorkBySlug($slug: String!) {
  workBy(slug: $slug) {
    databaseId
    title
    slug
    date
    featuredImage { node { sourceUrl altText } }
    workFields {
      client year type category description
      challenge solution outcome tags featured
    }
  }
}
";
