//! Argument lists for each git operation.

pub fn status() -> Vec<String> {
    vec!["status".to_string(), "-s".to_string()]
}

pub fn add(path: &str) -> Vec<String> {
    vec!["add".to_string(), path.to_string()]
}

pub fn checkout(reference: Option<&str>, new_branch: Option<&str>) -> Vec<String> {
    let mut args = vec!["checkout".to_string()];
    if let Some(branch) = new_branch {
        args.push("-b".to_string());
        args.push(branch.to_string());
    }
    if let Some(reference) = reference {
        args.push(reference.to_string());
    }
    args
}

pub fn commit(title: &str) -> Vec<String> {
    vec!["commit".to_string(), "-m".to_string(), title.to_string()]
}

pub fn delete_branch(name: &str) -> Vec<String> {
    vec!["branch".to_string(), "-D".to_string(), name.to_string()]
}

pub fn fast_forward(remote: &str, reference: &str) -> Vec<String> {
    vec![
        "pull".to_string(),
        "--ff-only".to_string(),
        remote.to_string(),
        reference.to_string(),
    ]
}

pub fn fetch(remote: &str, reference: Option<&str>) -> Vec<String> {
    let mut args = vec!["fetch".to_string(), remote.to_string()];
    if let Some(reference) = reference {
        args.push(reference.to_string());
    }
    args
}

pub fn list_heads(remote: &str, branch: &str) -> Vec<String> {
    vec![
        "ls-remote".to_string(),
        "--heads".to_string(),
        remote.to_string(),
        branch.to_string(),
    ]
}

pub fn log(revision_range: &str, options: &[&str]) -> Vec<String> {
    let mut args = vec!["log".to_string(), revision_range.to_string()];
    args.extend(options.iter().map(|o| o.to_string()));
    args
}

pub fn push(remote: &str, branch: &str, include_tags: bool) -> Vec<String> {
    let mut args = vec![
        "push".to_string(),
        remote.to_string(),
        "-u".to_string(),
        format!("{}:{}", branch, branch),
    ];
    if include_tags {
        args.push("--tags".to_string());
    }
    args
}

pub fn tag() -> Vec<String> {
    vec!["tag".to_string()]
}

pub fn remote_url(remote: &str) -> Vec<String> {
    vec!["remote".to_string(), "get-url".to_string(), remote.to_string()]
}

pub fn clone(remote: &str, url: &str, directory: &str) -> Vec<String> {
    vec![
        "clone".to_string(),
        "-o".to_string(),
        remote.to_string(),
        url.to_string(),
        directory.to_string(),
    ]
}

pub fn add_remote(name: &str, url: &str) -> Vec<String> {
    vec![
        "remote".to_string(),
        "add".to_string(),
        name.to_string(),
        url.to_string(),
    ]
}
